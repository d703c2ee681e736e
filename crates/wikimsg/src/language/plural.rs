//! CLDR plural category resolution.
//!
//! Different languages have different plural rules - English has "one" and
//! "other", while Russian has "one", "few", "many", and "other", and Arabic
//! uses all six categories. Rule evaluation is delegated to ICU4X; each
//! [`LanguageProfile`](super::LanguageProfile) owns the `PluralRules` for
//! its locale, so rules are built once per cached profile.

use icu_locale_core::locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Locales with ICU rule data wired up here. Anything else resolves with
/// English rules.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bn", "de", "en", "es", "fa", "fr", "he", "hi", "pl", "ru", "uk",
];

/// Normalize a language code to a supported static string reference.
fn normalize_lang(lang: &str) -> &'static str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&code| code == lang)
        .copied()
        .unwrap_or("en")
}

/// Build `PluralRules` for a language code.
pub(crate) fn build_rules(lang: &str) -> PluralRules {
    let loc = match normalize_lang(lang) {
        "ar" => locale!("ar"),
        "bn" => locale!("bn"),
        "de" => locale!("de"),
        "es" => locale!("es"),
        "fa" => locale!("fa"),
        "fr" => locale!("fr"),
        "he" => locale!("he"),
        "hi" => locale!("hi"),
        "pl" => locale!("pl"),
        "ru" => locale!("ru"),
        "uk" => locale!("uk"),
        _ => locale!("en"),
    };
    PluralRules::try_new(loc.into(), PluralRuleType::Cardinal.into())
        .expect("locale should be supported")
}

/// Translate a `PluralCategory` enum to its string representation.
pub(crate) fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Get the CLDR plural category for a number in a given language.
///
/// Returns one of: "zero", "one", "two", "few", "many", "other".
///
/// # Examples
///
/// ```
/// use wikimsg::language::plural_category;
///
/// // English: 1 = "one", everything else = "other"
/// assert_eq!(plural_category("en", 1), "one");
/// assert_eq!(plural_category("en", 2), "other");
///
/// // Russian: complex rules for "one", "few", "many", "other"
/// assert_eq!(plural_category("ru", 1), "one");
/// assert_eq!(plural_category("ru", 2), "few");
/// assert_eq!(plural_category("ru", 5), "many");
/// ```
pub fn plural_category(lang: &str, n: i64) -> &'static str {
    category_str(build_rules(lang).category_for(n))
}
