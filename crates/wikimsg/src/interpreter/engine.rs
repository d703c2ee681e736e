//! The user-facing render entry point.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bon::Builder;

use crate::interpreter::context::EvalContext;
use crate::interpreter::error::{EngineError, LoadError, RenderWarning, compute_suggestions};
use crate::interpreter::evaluator::{Frame, eval_node};
use crate::interpreter::resolver::{ArticlePathResolver, TitleResolver};
use crate::interpreter::store::MessageStore;
use crate::language::ProfileCache;
use crate::parser::{AstNode, parse};
use crate::types::{Rendered, Value};

/// The message render engine.
///
/// Owns the message store and an AST cache; shares an injectable
/// [`ProfileCache`] and title resolver. The render pipeline itself is pure
/// and synchronous over immutable inputs.
///
/// # Example
///
/// ```
/// use wikimsg::{Engine, values};
///
/// let mut engine = Engine::builder().language("en").build();
/// engine
///     .load_messages_str("en", r#"{ "greeting": "Hello $1!" }"#)
///     .unwrap();
///
/// assert_eq!(engine.render("greeting", &values!["World"]), "Hello World!");
/// ```
#[derive(Builder)]
#[builder(on(String, into))]
pub struct Engine {
    /// Active language code (e.g. "en", "ru", "de").
    #[builder(default = "en".to_string())]
    language: String,

    /// Site name substituted for `{{SITENAME}}`.
    #[builder(default = "Wiki".to_string())]
    site_name: String,

    /// Message store; externally populated, read-only during rendering.
    #[builder(default)]
    store: MessageStore,

    /// Shared per-locale profile cache.
    #[builder(default = Arc::new(ProfileCache::new()))]
    profiles: Arc<ProfileCache>,

    /// Title-to-URL resolution for internal links.
    #[builder(default = Box::new(ArticlePathResolver::default()))]
    resolver: Box<dyn TitleResolver>,

    /// Nested-message expansion depth limit.
    #[builder(default = 16)]
    max_depth: usize,

    /// Cache of parsed message ASTs keyed by (key, raw text).
    ///
    /// Uses `RefCell` for interior mutability so rendering can remain
    /// `&self`. Stale entries after a store reload are unreachable and
    /// reclaimed by [`clear_ast_cache`](Engine::clear_ast_cache).
    #[builder(skip)]
    ast_cache: RefCell<HashMap<(String, String), AstNode>>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::builder().build()
    }
}

impl Engine {
    /// Create a new engine with default settings (English).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new engine with the specified language.
    pub fn with_language(language: impl Into<String>) -> Self {
        Engine::builder().language(language.into()).build()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Get the active language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Change the active language.
    ///
    /// Messages for the new language must already be loaded (or reachable
    /// through the English fallback).
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Get the configured site name.
    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Get the shared profile cache.
    pub fn profiles(&self) -> &Arc<ProfileCache> {
        &self.profiles
    }

    /// Get the message store (read-only).
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Get the message store (mutable) for external population.
    pub fn store_mut(&mut self) -> &mut MessageStore {
        &mut self.store
    }

    // =========================================================================
    // Message Loading
    // =========================================================================

    /// Load a JSON message bundle from a file for a language.
    pub fn load_messages(
        &mut self,
        language: &str,
        path: impl AsRef<Path>,
    ) -> Result<usize, LoadError> {
        self.store.load_file(language, path)
    }

    /// Load a JSON message bundle from a string for a language.
    pub fn load_messages_str(&mut self, language: &str, json: &str) -> Result<usize, LoadError> {
        self.store.load_str(language, json)
    }

    /// Hot-reload a language's bundle from its original file path.
    pub fn reload_messages(&mut self, language: &str) -> Result<usize, LoadError> {
        self.store.reload(language)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render a message to HTML.
    pub fn render(&self, key: &str, args: &[Value]) -> String {
        self.render_internal(key, args).0.to_html()
    }

    /// Render a message to plain text (markup stripped).
    pub fn render_plain(&self, key: &str, args: &[Value]) -> String {
        self.render_internal(key, args).0.to_plain()
    }

    /// Render a message to its escaped output tree.
    pub fn render_tree(&self, key: &str, args: &[Value]) -> Rendered {
        self.render_internal(key, args).0
    }

    /// Render a message with explicit options.
    ///
    /// Arguments may be passed positionally or via
    /// [`RenderOptions::args`]; supplying both is the one hard error in
    /// the engine, because it indicates a caller bug rather than
    /// untrusted content.
    pub fn render_with(
        &self,
        key: &str,
        args: &[Value],
        options: &RenderOptions,
    ) -> Result<Output, EngineError> {
        let effective: &[Value] = match &options.args {
            Some(_) if !args.is_empty() => return Err(EngineError::ConflictingArguments),
            Some(option_args) => option_args.as_slice(),
            None => args,
        };
        let (tree, warnings) = self.render_internal(key, effective);
        let text = match options.format {
            OutputFormat::Html => tree.to_html(),
            OutputFormat::Plain => tree.to_plain(),
        };
        Ok(Output { text, warnings })
    }

    fn render_internal(&self, key: &str, args: &[Value]) -> (Rendered, Vec<RenderWarning>) {
        let Some(raw) = self.store.get(&self.language, key) else {
            let available = self.store.keys(&self.language);
            let warning = RenderWarning::MissingMessage {
                key: key.to_string(),
                suggestions: compute_suggestions(key, &available),
            };
            let placeholder = Rendered::escaped(format!("[{}]", key.to_lowercase()));
            return (placeholder, vec![warning]);
        };
        let raw = raw.to_string();
        let ast = self.cached_ast(key, &raw);
        let profile = self.profiles.get(&self.language);
        let mut ctx = EvalContext::new(
            &self.store,
            &profile,
            &self.language,
            self.resolver.as_ref(),
            &self.site_name,
            self.max_depth,
        );
        ctx.push_call(key);
        let frame = Frame {
            key,
            source: &raw,
            args,
        };
        let tree = eval_node(&ast, &frame, &mut ctx);
        (tree, ctx.take_warnings())
    }

    // =========================================================================
    // AST Cache
    // =========================================================================

    /// Clear the parsed-AST cache.
    pub fn clear_ast_cache(&self) {
        self.ast_cache.borrow_mut().clear();
    }

    /// Return the number of cached message ASTs.
    pub fn ast_cache_len(&self) -> usize {
        self.ast_cache.borrow().len()
    }

    /// Look up or parse and cache a message AST.
    fn cached_ast(&self, key: &str, raw: &str) -> AstNode {
        let cache_key = (key.to_string(), raw.to_string());
        {
            let cache = self.ast_cache.borrow();
            if let Some(ast) = cache.get(&cache_key) {
                return ast.clone();
            }
        }
        let ast = parse(key, raw);
        self.ast_cache.borrow_mut().insert(cache_key, ast.clone());
        ast
    }
}

/// Output format requested through [`RenderOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// HTML markup with escaped text runs.
    #[default]
    Html,
    /// Plain text with markup stripped.
    Plain,
}

/// Options for [`Engine::render_with`].
#[derive(Debug, Clone, Default, Builder)]
pub struct RenderOptions {
    /// Requested output format.
    #[builder(default)]
    pub format: OutputFormat,
    /// Arguments supplied through the options object instead of
    /// positionally. Setting this *and* passing positional arguments is
    /// rejected with [`EngineError::ConflictingArguments`].
    pub args: Option<Vec<Value>>,
}

/// A rendered message plus the warnings observed while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub text: String,
    pub warnings: Vec<RenderWarning>,
}
