mod rendered;
mod value;

pub use rendered::{Rendered, escape_html};
pub use value::{Gender, User, Value};
