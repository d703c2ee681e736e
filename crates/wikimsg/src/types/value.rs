use bon::Builder;

/// A positional argument passed to a message render call.
///
/// The `Value` enum provides a dynamic type system for message arguments,
/// allowing numbers, strings, trusted markup fragments, and user capability
/// objects to be passed interchangeably.
///
/// Escaping policy: `Text`, `Number`, and `Float` values are HTML-escaped
/// when substituted into output. `Markup` values are inserted verbatim and
/// must only be built from content that was already produced by a safe
/// renderer.
///
/// # Example
///
/// ```
/// use wikimsg::Value;
///
/// // Numbers become Value::Number
/// let count: Value = 42.into();
///
/// // Strings become Value::Text
/// let name: Value = "Alice".into();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer number (used for plural selection).
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A plain string, escaped on substitution.
    Text(String),

    /// A pre-rendered trusted fragment, inserted without escaping.
    Markup(String),

    /// A user capability object (supplies a gender to `{{GENDER:}}`).
    User(User),
}

impl Value {
    /// Get this value as an integer, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Float(_) | Value::Text(_) | Value::Markup(_) | Value::User(_) => None,
        }
    }

    /// Get this value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Number(n) => Some(*n as f64),
            Value::Text(_) | Value::Markup(_) | Value::User(_) => None,
        }
    }

    /// Get this value as plain text, if it is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) | Value::Float(_) | Value::Markup(_) | Value::User(_) => None,
        }
    }

    /// Get this value as a user object, if it is one.
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Value::User(u) => Some(u),
            Value::Number(_) | Value::Float(_) | Value::Text(_) | Value::Markup(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Markup(m) => write!(f, "{m}"),
            Value::User(u) => write!(f, "{}", u.name()),
        }
    }
}

// From implementations for common types

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as i64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<User> for Value {
    fn from(u: User) -> Self {
        Value::User(u)
    }
}

/// Grammatical gender exposed by a [`User`] capability object.
///
/// Anything the engine cannot classify as male or female selects the
/// neutral message form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Neutral,
}

impl Gender {
    /// Classify a gender keyword. Unknown keywords are neutral.
    pub fn from_keyword(keyword: &str) -> Gender {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Neutral,
        }
    }
}

/// A user/context capability object.
///
/// Consumed by `{{GENDER:$n|...}}` when passed as the referenced argument;
/// substituting it directly into text yields the (escaped) display name.
///
/// # Example
///
/// ```
/// use wikimsg::{Gender, User};
///
/// let user = User::builder().name("Ana").gender(Gender::Female).build();
/// assert_eq!(user.name(), "Ana");
/// assert_eq!(user.gender(), Gender::Female);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Builder)]
#[builder(on(String, into))]
pub struct User {
    #[builder(default)]
    name: String,
    #[builder(default)]
    gender: Gender,
}

impl User {
    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's grammatical gender.
    pub fn gender(&self) -> Gender {
        self.gender
    }
}
