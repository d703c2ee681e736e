//! The escaped output tree produced by evaluation.
//!
//! Escaping state is an explicit tag on every run of output, threaded
//! through each evaluation step: `Escaped` text has its HTML entities
//! applied exactly once, at serialization time; `Raw` markup is emitted
//! verbatim. An `Escaped` run is never reinterpreted as `Raw`.

/// A node in the rendered output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Text pending HTML entity escaping. Substituted argument content
    /// always lands here unless the argument was explicitly trusted.
    Escaped(String),
    /// Markup emitted verbatim: engine-synthesized anchors and
    /// caller-supplied trusted fragments.
    Raw(String),
    /// Sequential composition; each child keeps its own escaping state.
    Seq(Vec<Rendered>),
}

impl Rendered {
    /// An empty output tree.
    pub fn empty() -> Rendered {
        Rendered::Seq(Vec::new())
    }

    /// Escaped text node.
    pub fn escaped(text: impl Into<String>) -> Rendered {
        Rendered::Escaped(text.into())
    }

    /// Raw markup node.
    pub fn raw(markup: impl Into<String>) -> Rendered {
        Rendered::Raw(markup.into())
    }

    /// True if this tree serializes to an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Rendered::Escaped(s) | Rendered::Raw(s) => s.is_empty(),
            Rendered::Seq(children) => children.iter().all(Rendered::is_empty),
        }
    }

    /// True if any run in this tree is raw markup.
    pub fn contains_raw(&self) -> bool {
        match self {
            Rendered::Escaped(_) => false,
            Rendered::Raw(markup) => !markup.is_empty(),
            Rendered::Seq(children) => children.iter().any(Rendered::contains_raw),
        }
    }

    /// Serialize to HTML: escaped runs are entity-escaped, raw runs pass
    /// through verbatim.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.push_html(&mut out);
        out
    }

    /// Serialize to plain text: escaped runs are emitted as-is, raw markup
    /// is stripped to its textual content (anchors reduce to their display
    /// text).
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_html(&self, out: &mut String) {
        match self {
            Rendered::Escaped(text) => escape_into(text, out),
            Rendered::Raw(markup) => out.push_str(markup),
            Rendered::Seq(children) => {
                for child in children {
                    child.push_html(out);
                }
            }
        }
    }

    fn push_plain(&self, out: &mut String) {
        match self {
            Rendered::Escaped(text) => out.push_str(text),
            Rendered::Raw(markup) => strip_markup_into(markup, out),
            Rendered::Seq(children) => {
                for child in children {
                    child.push_plain(out);
                }
            }
        }
    }
}

/// Escape `&`, `<`, `>`, and `"` for safe embedding in HTML text and
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Strip tags from a markup run, unescaping the entities this engine
/// emits, so plain-text output contains no HTML.
fn strip_markup_into(markup: &str, out: &mut String) {
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        push_unescaped(&rest[..open], out);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                // Unterminated tag: nothing textual remains.
                return;
            }
        }
    }
    push_unescaped(rest, out);
}

fn push_unescaped(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let mut replaced = false;
        for (entity, plain) in [("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">"), ("&quot;", "\"")] {
            if rest.starts_with(entity) {
                out.push_str(plain);
                rest = &rest[entity.len()..];
                replaced = true;
                break;
            }
        }
        if !replaced {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_html_significant_chars() {
        assert_eq!(escape_html(r#"a & <b> "c""#), "a &amp; &lt;b&gt; &quot;c&quot;");
    }

    #[test]
    fn html_serialization_escapes_once() {
        let tree = Rendered::Seq(vec![
            Rendered::escaped("x < y"),
            Rendered::raw("<b>!</b>"),
        ]);
        assert_eq!(tree.to_html(), "x &lt; y<b>!</b>");
    }

    #[test]
    fn reserialized_output_is_not_escaped_again() {
        let first = Rendered::escaped("a & b").to_html();
        // A fully serialized string re-enters a later pass as trusted markup.
        let second = Rendered::raw(first.clone()).to_html();
        assert_eq!(second, first);
    }

    #[test]
    fn plain_strips_anchor_to_display_text() {
        let tree = Rendered::raw(r#"<a href="/wiki/Foo" title="Foo">Foo bar</a>"#);
        assert_eq!(tree.to_plain(), "Foo bar");
    }

    #[test]
    fn plain_unescapes_entities_inside_markup() {
        let tree = Rendered::raw("<i>a &amp; b</i>");
        assert_eq!(tree.to_plain(), "a & b");
    }

    #[test]
    fn empty_tree_is_empty() {
        assert!(Rendered::empty().is_empty());
        assert!(Rendered::Seq(vec![Rendered::escaped("")]).is_empty());
        assert!(!Rendered::escaped("x").is_empty());
    }
}
