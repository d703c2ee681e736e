//! Title-to-URL resolution for internal links.

use unicode_segmentation::UnicodeSegmentation;

/// Maps a page name to the URL an internal link should point at.
///
/// Title resolution is a collaborator, not engine logic: the engine only
/// needs a URL for `[[target]]` anchors and takes whatever implementation
/// the caller injects.
pub trait TitleResolver {
    fn url_for(&self, page: &str) -> String;
}

/// Resolves titles against an article path pattern such as `/wiki/$1`.
///
/// Normalization: trim, uppercase the first grapheme, replace spaces with
/// underscores, percent-encode characters unsafe in a URL path.
///
/// # Example
///
/// ```
/// use wikimsg::{ArticlePathResolver, TitleResolver};
///
/// let resolver = ArticlePathResolver::default();
/// assert_eq!(resolver.url_for("main page"), "/wiki/Main_page");
/// ```
#[derive(Debug, Clone)]
pub struct ArticlePathResolver {
    article_path: String,
}

impl ArticlePathResolver {
    /// A resolver substituting normalized titles into `article_path` at
    /// the `$1` marker.
    pub fn new(article_path: impl Into<String>) -> ArticlePathResolver {
        ArticlePathResolver {
            article_path: article_path.into(),
        }
    }

    fn normalize(page: &str) -> String {
        let trimmed = page.trim();
        let mut graphemes = trimmed.graphemes(true);
        let mut title = String::with_capacity(trimmed.len());
        if let Some(first) = graphemes.next() {
            title.push_str(&first.to_uppercase());
        }
        title.push_str(graphemes.as_str());
        title.replace(' ', "_")
    }

    fn encode(title: &str) -> String {
        let mut out = String::with_capacity(title.len());
        for c in title.chars() {
            match c {
                '"' | '#' | '%' | '&' | '<' | '>' | '?' => {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).bytes() {
                        out.push_str(&format!("%{byte:02X}"));
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}

impl TitleResolver for ArticlePathResolver {
    fn url_for(&self, page: &str) -> String {
        let title = Self::encode(&Self::normalize(page));
        self.article_path.replace("$1", &title)
    }
}

impl Default for ArticlePathResolver {
    fn default() -> Self {
        ArticlePathResolver::new("/wiki/$1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_spaces() {
        let r = ArticlePathResolver::default();
        assert_eq!(r.url_for("foo bar"), "/wiki/Foo_bar");
        assert_eq!(r.url_for("  trimmed  "), "/wiki/Trimmed");
    }

    #[test]
    fn first_grapheme_uppercased_non_ascii() {
        let r = ArticlePathResolver::default();
        assert_eq!(r.url_for("über uns"), "/wiki/Über_uns");
    }

    #[test]
    fn unsafe_chars_percent_encoded() {
        let r = ArticlePathResolver::default();
        assert_eq!(r.url_for("a&b"), "/wiki/A%26b");
        assert_eq!(r.url_for("what?"), "/wiki/What%3F");
    }

    #[test]
    fn custom_article_path() {
        let r = ArticlePathResolver::new("https://example.org/w/$1");
        assert_eq!(r.url_for("Page"), "https://example.org/w/Page");
    }
}
