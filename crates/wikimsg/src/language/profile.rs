//! The constructed runtime form of a locale's capabilities.

use std::collections::HashMap;

use icu_plurals::PluralRules;

use crate::language::data::LocaleSpec;
use crate::language::numerals::NumeralFormatter;
use crate::language::plural::{build_rules, category_str};

/// Per-locale capabilities: plural-category selection, grammatical-case
/// transformation, and numeral formatting.
///
/// Profiles are constructed from [`LocaleSpec`] data and cached per locale
/// code by [`ProfileCache`](super::ProfileCache); evaluation never mutates
/// them.
pub struct LanguageProfile {
    locale: String,
    categories: Vec<String>,
    rules: PluralRules,
    grammar: HashMap<String, HashMap<String, String>>,
    numerals: NumeralFormatter,
}

impl LanguageProfile {
    /// Construct a profile from a locale spec.
    ///
    /// A digit table that does not contain exactly ten characters is
    /// ignored in favor of ASCII digits.
    pub fn from_spec(spec: &LocaleSpec) -> LanguageProfile {
        let digits = spec.digits.as_ref().and_then(|table| {
            let chars: Vec<char> = table.chars().collect();
            <[char; 10]>::try_from(chars).ok()
        });
        LanguageProfile {
            locale: spec.locale.clone(),
            categories: spec.categories.clone(),
            rules: build_rules(&spec.locale),
            grammar: spec.grammar.clone(),
            numerals: NumeralFormatter::new(digits, spec.decimal_sep, spec.group_sep),
        }
    }

    /// The English-like fallback profile, reported under the given locale
    /// code.
    pub fn fallback(locale: impl Into<String>) -> LanguageProfile {
        LanguageProfile::from_spec(&LocaleSpec::english_like(locale))
    }

    /// The locale code this profile was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The plural categories message forms are matched against, in order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The form index for a count: the position of the count's CLDR
    /// category in this locale's category order. A category missing from
    /// the order maps to the last position (the "other" slot).
    pub fn plural_index(&self, n: i64) -> usize {
        let category = category_str(self.rules.category_for(n));
        self.categories
            .iter()
            .position(|c| c == category)
            .unwrap_or_else(|| self.categories.len().saturating_sub(1))
    }

    /// Transform a word under a grammatical case via the locale's grammar
    /// table. An unknown case or word returns the word unchanged.
    pub fn grammar_case(&self, word: &str, case: &str) -> String {
        self.grammar
            .get(case)
            .and_then(|forms| forms.get(word))
            .cloned()
            .unwrap_or_else(|| word.to_string())
    }

    /// Whether the grammar table defines the given case at all.
    pub fn has_grammar_case(&self, case: &str) -> bool {
        self.grammar.contains_key(case)
    }

    /// The locale's numeral formatter.
    pub fn numerals(&self) -> &NumeralFormatter {
        &self.numerals
    }

    /// Format a canonical number into the locale's digits and separators.
    pub fn format_number(&self, canonical: &str) -> String {
        self.numerals.format(canonical)
    }

    /// Parse a locale-formatted numeral back to canonical form.
    pub fn parse_number(&self, localized: &str) -> String {
        self.numerals.parse(localized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::data::builtin_specs;

    fn profile(locale: &str) -> LanguageProfile {
        let spec = builtin_specs()
            .into_iter()
            .find(|s| s.locale == locale)
            .unwrap();
        LanguageProfile::from_spec(&spec)
    }

    #[test]
    fn english_plural_indices() {
        let en = profile("en");
        assert_eq!(en.plural_index(1), 0);
        assert_eq!(en.plural_index(0), 1);
        assert_eq!(en.plural_index(2), 1);
    }

    #[test]
    fn russian_plural_indices() {
        let ru = profile("ru");
        assert_eq!(ru.plural_index(1), 0);
        assert_eq!(ru.plural_index(2), 1);
        assert_eq!(ru.plural_index(5), 2);
        assert_eq!(ru.plural_index(21), 0);
    }

    #[test]
    fn fallback_is_english_like() {
        let xx = LanguageProfile::fallback("xx");
        assert_eq!(xx.locale(), "xx");
        assert_eq!(xx.plural_index(1), 0);
        assert_eq!(xx.plural_index(7), 1);
    }

    #[test]
    fn unknown_grammar_case_is_identity() {
        let en = profile("en");
        assert_eq!(en.grammar_case("Wikipedia", "genitive"), "Wikipedia");
    }
}
