//! Built-in locale specifications.
//!
//! A [`LocaleSpec`] is plain data: plural category order, an optional
//! ten-character digit table, separator characters, and a grammar table
//! (`case -> word -> inflected form`). Callers register additional specs
//! through [`ProfileCache::register`](super::ProfileCache::register);
//! nothing in the engine branches on a locale code.

use std::collections::HashMap;

use serde::Deserialize;

/// Data describing one locale's capabilities.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleSpec {
    /// Locale code (e.g. "en", "ru", "ar").
    pub locale: String,

    /// Plural categories in the order message forms are matched against
    /// them. Defaults to the English-like `["one", "other"]`.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Ten transliterated digit characters for 0-9, or `None` for ASCII.
    #[serde(default)]
    pub digits: Option<String>,

    /// Decimal separator character.
    #[serde(default = "default_decimal_sep")]
    pub decimal_sep: char,

    /// Group separator character.
    #[serde(default = "default_group_sep")]
    pub group_sep: char,

    /// Grammatical-case table: case name -> word -> inflected form.
    #[serde(default)]
    pub grammar: HashMap<String, HashMap<String, String>>,
}

fn default_categories() -> Vec<String> {
    vec!["one".to_string(), "other".to_string()]
}

fn default_decimal_sep() -> char {
    '.'
}

fn default_group_sep() -> char {
    ','
}

impl LocaleSpec {
    /// An English-like spec for the given locale code: two plural forms,
    /// ASCII digits, `.` decimal and `,` group separators, no grammar.
    pub fn english_like(locale: impl Into<String>) -> LocaleSpec {
        LocaleSpec {
            locale: locale.into(),
            categories: default_categories(),
            digits: None,
            decimal_sep: default_decimal_sep(),
            group_sep: default_group_sep(),
            grammar: HashMap::new(),
        }
    }
}

fn spec(
    locale: &str,
    categories: &[&str],
    digits: Option<&str>,
    decimal_sep: char,
    group_sep: char,
) -> LocaleSpec {
    LocaleSpec {
        locale: locale.to_string(),
        categories: categories.iter().map(|c| (*c).to_string()).collect(),
        digits: digits.map(str::to_string),
        decimal_sep,
        group_sep,
        grammar: HashMap::new(),
    }
}

/// The locale specs shipped with the engine.
pub fn builtin_specs() -> Vec<LocaleSpec> {
    vec![
        spec("en", &["one", "other"], None, '.', ','),
        spec("de", &["one", "other"], None, ',', '.'),
        spec("fr", &["one", "many", "other"], None, ',', '\u{a0}'),
        spec("es", &["one", "many", "other"], None, ',', '.'),
        spec("pl", &["one", "few", "many", "other"], None, ',', '\u{a0}'),
        spec("ru", &["one", "few", "many", "other"], None, ',', '\u{a0}'),
        spec("uk", &["one", "few", "many", "other"], None, ',', '\u{a0}'),
        spec("he", &["one", "two", "many", "other"], None, '.', ','),
        spec(
            "ar",
            &["zero", "one", "two", "few", "many", "other"],
            Some("٠١٢٣٤٥٦٧٨٩"),
            '٫',
            '٬',
        ),
        spec("fa", &["one", "other"], Some("۰۱۲۳۴۵۶۷۸۹"), '٫', '٬'),
        spec("hi", &["one", "other"], Some("०१२३४५६७८९"), '.', ','),
        spec("bn", &["one", "other"], Some("০১২৩৪৫৬৭৮৯"), '.', ','),
    ]
}
