//! Integration tests for the built-in template constructs:
//! PLURAL, GENDER, GRAMMAR, formatnum, int, SITENAME, and the
//! unknown-name fallback.

use std::collections::HashMap;

use wikimsg::{Engine, Gender, LocaleSpec, RenderWarning, User, Value, values};

fn engine(language: &str, json: &str) -> Engine {
    let mut engine = Engine::builder().language(language).build();
    engine.load_messages_str(language, json).unwrap();
    engine
}

// =============================================================================
// PLURAL
// =============================================================================

#[test]
fn plural_english_one_vs_other() {
    let e = engine(
        "en",
        r#"{ "msgs": "You have $1 {{PLURAL:$1|message|messages}}." }"#,
    );
    assert_eq!(e.render("msgs", &values![1]), "You have 1 message.");
    assert_eq!(e.render("msgs", &values![0]), "You have 0 messages.");
    assert_eq!(e.render("msgs", &values![2]), "You have 2 messages.");
}

#[test]
fn plural_russian_categories() {
    let e = engine(
        "ru",
        r#"{ "cards": "{{PLURAL:$1|карта|карты|карт}}" }"#,
    );
    assert_eq!(e.render("cards", &values![1]), "карта");
    assert_eq!(e.render("cards", &values![2]), "карты");
    assert_eq!(e.render("cards", &values![5]), "карт");
    assert_eq!(e.render("cards", &values![21]), "карта");
}

#[test]
fn plural_missing_form_falls_back_to_last() {
    // Russian "many" (index 2) with only two forms supplied.
    let e = engine("ru", r#"{ "c": "{{PLURAL:$1|one|rest}}" }"#);
    assert_eq!(e.render("c", &values![5]), "rest");
}

#[test]
fn plural_explicit_form_wins_over_category() {
    let e = engine(
        "en",
        r#"{ "eggs": "{{PLURAL:$1|one egg|$1 eggs|12=a dozen eggs}}" }"#,
    );
    assert_eq!(e.render("eggs", &values![12]), "a dozen eggs");
    assert_eq!(e.render("eggs", &values![1]), "one egg");
    assert_eq!(e.render("eggs", &values![5]), "5 eggs");
}

#[test]
fn plural_count_in_locale_digits() {
    // The count is parsed back through the locale's numeral parser.
    let e = engine("ar", r#"{ "c": "{{PLURAL:٥|a|b|c|d|e|f}}" }"#);
    // Arabic: 5 is in the "few" category (index 3).
    assert_eq!(e.render("c", &[]), "d");
}

#[test]
fn plural_non_numeric_count_uses_last_form_with_warning() {
    let e = engine("en", r#"{ "c": "{{PLURAL:soon|one|some}}" }"#);
    let output = e
        .render_with("c", &[], &wikimsg::RenderOptions::default())
        .unwrap();
    assert_eq!(output.text, "some");
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        RenderWarning::BadPluralOperand { value } if value == "soon"
    )));
}

#[test]
fn plural_inner_parameters_still_escape() {
    let e = engine("en", r#"{ "c": "{{PLURAL:2|$1|$1 all}}" }"#);
    assert_eq!(e.render("c", &values!["<x>"]), "&lt;x&gt; all");
}

// =============================================================================
// GENDER
// =============================================================================

#[test]
fn gender_selects_by_user_object() {
    let e = engine("en", r#"{ "g": "{{GENDER:$1|he|she|they}}" }"#);
    let male = User::builder().name("Bob").gender(Gender::Male).build();
    let female = User::builder().name("Ana").gender(Gender::Female).build();
    assert_eq!(e.render("g", &[Value::User(male)]), "he");
    assert_eq!(e.render("g", &[Value::User(female)]), "she");
}

#[test]
fn gender_selects_by_keyword() {
    let e = engine("en", r#"{ "g": "{{GENDER:$1|he|she|they}}" }"#);
    assert_eq!(e.render("g", &values!["male"]), "he");
    assert_eq!(e.render("g", &values!["female"]), "she");
    assert_eq!(e.render("g", &values!["unknown"]), "they");
}

#[test]
fn gender_absent_argument_selects_neutral() {
    let e = engine("en", r#"{ "g": "{{GENDER:$1|he|she|they}}" }"#);
    assert_eq!(e.render("g", &[]), "they");
}

#[test]
fn gender_falls_back_to_last_form() {
    let e = engine("en", r#"{ "g": "{{GENDER:$1|m|f}}" }"#);
    assert_eq!(e.render("g", &values!["neither"]), "f");
}

#[test]
fn gender_with_no_forms_collapses_to_nothing() {
    let e = engine("en", r#"{ "g": "a{{GENDER:$1}}b" }"#);
    assert_eq!(e.render("g", &values!["male"]), "ab");
}

// =============================================================================
// GRAMMAR
// =============================================================================

#[test]
fn grammar_unknown_case_returns_word_unchanged() {
    let e = engine("en", r#"{ "g": "{{GRAMMAR:genitive|Wikipedia}}" }"#);
    assert_eq!(e.render("g", &[]), "Wikipedia");
}

#[test]
fn grammar_table_transforms_word() {
    let e = engine("fi", r#"{ "g": "{{GRAMMAR:genitive|{{SITENAME}}}} etusivu" }"#);
    e.profiles().register(LocaleSpec {
        grammar: HashMap::from([(
            "genitive".to_string(),
            HashMap::from([("Wiki".to_string(), "Wikin".to_string())]),
        )]),
        ..LocaleSpec::english_like("fi")
    });
    assert_eq!(e.render("g", &[]), "Wikin etusivu");
}

#[test]
fn grammar_known_case_unknown_word_warns() {
    let e = engine("fi", r#"{ "g": "{{GRAMMAR:genitive|Other}}" }"#);
    e.profiles().register(LocaleSpec {
        grammar: HashMap::from([(
            "genitive".to_string(),
            HashMap::from([("Wiki".to_string(), "Wikin".to_string())]),
        )]),
        ..LocaleSpec::english_like("fi")
    });
    let output = e
        .render_with("g", &[], &wikimsg::RenderOptions::default())
        .unwrap();
    assert_eq!(output.text, "Other");
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        RenderWarning::MissingGrammarForm { word, case } if word == "Other" && case == "genitive"
    )));
}

// =============================================================================
// formatnum
// =============================================================================

#[test]
fn formatnum_identity_for_english() {
    let e = engine("en", r#"{ "n": "{{formatnum:$1}}" }"#);
    assert_eq!(e.render("n", &values!["1234567.89"]), "1234567.89");
}

#[test]
fn formatnum_decimal_comma_locale() {
    let e = engine("de", r#"{ "n": "{{formatnum:$1}}" }"#);
    assert_eq!(e.render("n", &values!["987654321.654321"]), "987654321,654321");
}

#[test]
fn formatnum_transliterates_digits() {
    let e = engine("fa", r#"{ "n": "{{formatnum:3}}" }"#);
    assert_eq!(e.render("n", &[]), "۳");
}

#[test]
fn formatnum_reverse_parses_back() {
    let e = engine("ar", r#"{ "n": "{{formatnum:$1|R}}" }"#);
    assert_eq!(e.render("n", &values!["١٢٣٤٥"]), "12345");
}

#[test]
fn formatnum_reverse_strips_grouping() {
    let e = engine("en", r#"{ "n": "{{formatnum:1,234|R}}" }"#);
    assert_eq!(e.render("n", &[]), "1234");
}

#[test]
fn formatnum_non_numeric_is_identity() {
    let e = engine("de", r#"{ "n": "{{formatnum:soon}}" }"#);
    assert_eq!(e.render("n", &[]), "soon");
}

// =============================================================================
// Nested messages: int and unknown names
// =============================================================================

#[test]
fn int_expands_existing_key() {
    let e = engine(
        "en",
        r#"{ "outer": "A {{int:inner}} B", "inner": "nested" }"#,
    );
    assert_eq!(e.render("outer", &[]), "A nested B");
}

#[test]
fn int_is_case_insensitive() {
    let e = engine("en", r#"{ "outer": "{{Int:inner}}", "inner": "x" }"#);
    assert_eq!(e.render("outer", &[]), "x");
}

#[test]
fn int_nested_message_gets_no_arguments() {
    // int: is a static lookup; the outer arguments do not leak in.
    let e = engine(
        "en",
        r#"{ "outer": "{{int:inner}}", "inner": "got $1" }"#,
    );
    assert_eq!(e.render("outer", &values!["leaked"]), "got $1");
}

#[test]
fn int_missing_key_renders_placeholder() {
    let e = engine("en", r#"{ "outer": "{{int:Missing-Key}}" }"#);
    assert_eq!(e.render("outer", &[]), "[missing-key]");
}

#[test]
fn int_missing_key_warns_with_suggestions() {
    let e = engine(
        "en",
        r#"{ "outer": "{{int:inner-mesage}}", "inner-message": "x" }"#,
    );
    let output = e
        .render_with("outer", &[], &wikimsg::RenderOptions::default())
        .unwrap();
    assert_eq!(output.text, "[inner-mesage]");
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        RenderWarning::MissingMessage { key, suggestions }
            if key == "inner-mesage" && suggestions.contains(&"inner-message".to_string())
    )));
}

#[test]
fn cyclic_nested_messages_degrade_to_placeholder() {
    let e = engine(
        "en",
        r#"{ "a": "{{int:b}}", "b": "{{int:a}}" }"#,
    );
    let output = e
        .render_with("a", &[], &wikimsg::RenderOptions::default())
        .unwrap();
    assert_eq!(output.text, "[a]");
    assert!(output
        .warnings
        .iter()
        .any(|w| matches!(w, RenderWarning::CyclicMessage { .. })));
}

#[test]
fn unknown_name_resolving_to_message_expands_with_args() {
    let e = engine(
        "en",
        r#"{ "outer": "{{greeting:World}}", "greeting": "Hello $1!" }"#,
    );
    assert_eq!(e.render("outer", &[]), "Hello World!");
}

#[test]
fn unknown_name_matches_with_lowercased_first_letter() {
    let e = engine(
        "en",
        r#"{ "outer": "{{Greeting:World}}", "greeting": "Hello $1!" }"#,
    );
    assert_eq!(e.render("outer", &[]), "Hello World!");
}

#[test]
fn unknown_name_without_message_renders_placeholder() {
    let e = engine("en", r#"{ "outer": "x {{FOOBAR}} y" }"#);
    assert_eq!(e.render("outer", &[]), "x [foobar] y");
}

// =============================================================================
// SITENAME
// =============================================================================

#[test]
fn sitename_substitutes_configured_name() {
    let mut e = Engine::builder()
        .language("en")
        .site_name("Examplepedia")
        .build();
    e.load_messages_str("en", r#"{ "m": "Welcome to {{SITENAME}}." }"#)
        .unwrap();
    assert_eq!(e.render("m", &[]), "Welcome to Examplepedia.");
}

#[test]
fn sitename_is_escaped_text() {
    let mut e = Engine::builder()
        .language("en")
        .site_name("Q&A Wiki")
        .build();
    e.load_messages_str("en", r#"{ "m": "{{SITENAME}}" }"#).unwrap();
    assert_eq!(e.render("m", &[]), "Q&amp;A Wiki");
}
