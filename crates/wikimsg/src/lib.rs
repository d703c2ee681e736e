pub mod interpreter;
pub mod language;
pub mod parser;
pub mod types;

pub use interpreter::{
    ArticlePathResolver, Engine, EngineError, LoadError, MessageStore, Output, OutputFormat,
    RenderOptions, RenderWarning, TitleResolver, compute_suggestions,
};
pub use language::{LanguageProfile, LocaleSpec, NumeralFormatter, ProfileCache};
pub use types::{Gender, Rendered, User, Value, escape_html};

/// Creates a `Vec<Value>` from positional arguments.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, or `User` objects directly.
///
/// # Example
///
/// ```
/// use wikimsg::{Value, values};
///
/// let args = values!["bar", 5];
/// assert_eq!(args.len(), 2);
/// assert_eq!(args[0], Value::Text("bar".to_string()));
/// assert_eq!(args[1], Value::Number(5));
/// ```
#[macro_export]
macro_rules! values {
    [] => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    [ $($value:expr),+ $(,)? ] => {
        ::std::vec![ $(::std::convert::Into::<$crate::Value>::into($value)),+ ]
    };
}
