//! Integration tests for positional substitution and the escaping model.

use wikimsg::{Engine, Value, values};

fn engine(json: &str) -> Engine {
    let mut engine = Engine::builder().language("en").build();
    engine.load_messages_str("en", json).unwrap();
    engine
}

// =============================================================================
// Positional substitution
// =============================================================================

#[test]
fn no_arguments_leaves_tokens_visible() {
    let e = engine(r#"{ "foo": "Foo $1 baz $2" }"#);
    assert_eq!(e.render("foo", &[]), "Foo $1 baz $2");
}

#[test]
fn partial_substitution() {
    let e = engine(r#"{ "foo": "Foo $1 baz $2" }"#);
    assert_eq!(e.render("foo", &values!["bar"]), "Foo bar baz $2");
}

#[test]
fn full_substitution() {
    let e = engine(r#"{ "foo": "Foo $1 baz $2" }"#);
    assert_eq!(e.render("foo", &values!["bar", "quux"]), "Foo bar baz quux");
}

#[test]
fn numeric_arguments_render_canonically() {
    let e = engine(r#"{ "n": "$1 and $2" }"#);
    assert_eq!(e.render("n", &values![7, 2.5]), "7 and 2.5");
}

#[test]
fn dollar_zero_is_never_an_argument() {
    let e = engine(r#"{ "z": "$0 stays" }"#);
    assert_eq!(e.render("z", &values!["x"]), "$0 stays");
}

#[test]
fn missing_message_renders_bracketed_placeholder() {
    let e = engine(r#"{ "foo": "x" }"#);
    assert_eq!(e.render("No-Such-Key", &[]), "[no-such-key]");
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn string_arguments_are_html_escaped() {
    let e = engine(r#"{ "m": "Hi $1" }"#);
    assert_eq!(
        e.render("m", &values!["<script>alert(1)</script>"]),
        "Hi &lt;script&gt;alert(1)&lt;/script&gt;"
    );
}

#[test]
fn quote_and_ampersand_escaped() {
    let e = engine(r#"{ "m": "$1" }"#);
    assert_eq!(e.render("m", &values![r#"a "b" & c"#]), "a &quot;b&quot; &amp; c");
}

#[test]
fn markup_arguments_pass_through_verbatim() {
    let e = engine(r#"{ "m": "Hi $1" }"#);
    assert_eq!(
        e.render("m", &[Value::Markup("<b>there</b>".to_string())]),
        "Hi <b>there</b>"
    );
}

#[test]
fn literal_message_text_is_escaped() {
    let e = engine(r#"{ "m": "1 < 2 & 2 > 1" }"#);
    assert_eq!(e.render("m", &[]), "1 &lt; 2 &amp; 2 &gt; 1");
}

#[test]
fn pre_rendered_output_is_not_double_escaped() {
    // A fragment produced by an earlier engine pass re-enters as Markup;
    // its entities must survive a second pass untouched.
    let e = engine(r#"{ "inner": "A & B", "outer": "wrap $1 end" }"#);
    let first_pass = e.render("inner", &[]);
    assert_eq!(first_pass, "A &amp; B");
    let second_pass = e.render("outer", &[Value::Markup(first_pass)]);
    assert_eq!(second_pass, "wrap A &amp; B end");
}

#[test]
fn plain_text_rendering_keeps_text_unescaped() {
    let e = engine(r#"{ "m": "1 < 2, $1" }"#);
    assert_eq!(e.render_plain("m", &values!["a & b"]), "1 < 2, a & b");
}

#[test]
fn user_argument_substitutes_display_name() {
    use wikimsg::{Gender, User};
    let e = engine(r#"{ "m": "by $1" }"#);
    let user = User::builder().name("Ana <3").gender(Gender::Female).build();
    assert_eq!(e.render("m", &[Value::User(user)]), "by Ana &lt;3");
}

// =============================================================================
// Parse-error surfacing
// =============================================================================

#[test]
fn malformed_template_renders_positioned_diagnostic() {
    let e = engine(r#"{ "bad": "{{PLURAL:1|x" }"#);
    assert_eq!(
        e.render("bad", &[]),
        "bad: Parse error at position 0 in input: {{PLURAL:1|x"
    );
}

#[test]
fn diagnostic_embeds_original_text_escaped() {
    let e = engine(r#"{ "bad": "a<b {{PLURAL:1|x" }"#);
    assert_eq!(
        e.render("bad", &[]),
        "bad: Parse error at position 4 in input: a&lt;b {{PLURAL:1|x"
    );
}
