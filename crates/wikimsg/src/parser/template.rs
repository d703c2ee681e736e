//! Message template parser using winnow.
//!
//! Parses translator-supplied message strings into an AST. Handles:
//! - Literal text runs
//! - Positional parameters: `$1`, `$2`, ...
//! - Template calls: `{{NAME}}`, `{{NAME:arg|arg}}`
//! - Internal links `[[target|display]]` and external links `[url text]`
//!
//! Parsing is total. A `$` before a non-digit, a `{{` that opens no
//! template, and stray braces or brackets all pass through as text. Once a
//! template body is committed (`{{NAME:` seen), a malformed body produces
//! the positioned diagnostic literal instead - a single bad translation
//! string must render something, never abort the caller.

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use super::ast::{AstNode, LinkDisplay};

/// Parse a raw message string into an AST.
///
/// `key` is the message key, used only to label the diagnostic literal
/// produced for malformed input.
pub fn parse(key: &str, input: &str) -> AstNode {
    let mut remaining = input;
    match sequence(&mut remaining, Context::TopLevel, input) {
        Ok(nodes) if remaining.is_empty() => AstNode::seq(nodes),
        Ok(_) | Err(_) => {
            let consumed = input.len() - remaining.len();
            let offset = input[..consumed].chars().count();
            AstNode::Literal(error_message(key, input, offset))
        }
    }
}

/// The diagnostic string format shared by the parser and the evaluator's
/// pipe-trick handling. `offset` is a char index into `input`.
pub(crate) fn error_message(key: &str, input: &str, offset: usize) -> String {
    format!("{key}: Parse error at position {offset} in input: {input}")
}

/// Where a text run is being parsed; controls which characters terminate
/// the enclosing construct versus pass through as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    /// Template argument: `|` separates, `}}` closes, a lone `}` is text.
    TemplateArg,
    /// Link target: the first `|` or any `]` ends it.
    LinkTarget,
    /// Link display: only `]]` ends it, so later `|` chars stay literal.
    LinkDisplay,
    /// External link display: `]` closes.
    ExtDisplay,
}

/// Parse a run of segments until end of input or the context terminator.
fn sequence(input: &mut &str, ctx: Context, base: &str) -> ModalResult<Vec<AstNode>> {
    let mut nodes: Vec<AstNode> = Vec::new();
    while !input.is_empty() && !at_terminator(input, ctx) {
        if let Some(text) = text_run(input, ctx) {
            push_literal(&mut nodes, text);
            continue;
        }
        match construct(input, base)? {
            AstNode::Literal(text) => push_literal(&mut nodes, text),
            node => nodes.push(node),
        }
    }
    Ok(nodes)
}

fn at_terminator(input: &str, ctx: Context) -> bool {
    match ctx {
        Context::TopLevel => false,
        Context::TemplateArg => input.starts_with('|') || input.starts_with("}}"),
        Context::LinkTarget => input.starts_with('|') || input.starts_with(']'),
        Context::LinkDisplay => input.starts_with("]]"),
        Context::ExtDisplay => input.starts_with(']'),
    }
}

/// Consume a maximal literal run: stops at potential construct starts
/// (`$`, `{`, `[`) and at the context terminator.
fn text_run(input: &mut &str, ctx: Context) -> Option<String> {
    let mut end = 0;
    for (i, c) in input.char_indices() {
        if matches!(c, '$' | '{' | '[') || run_break(&input[i..], c, ctx) {
            break;
        }
        end = i + c.len_utf8();
    }
    if end == 0 {
        return None;
    }
    let text = input[..end].to_string();
    *input = &input[end..];
    Some(text)
}

fn run_break(rest: &str, c: char, ctx: Context) -> bool {
    match ctx {
        Context::TopLevel => false,
        Context::TemplateArg => c == '|' || rest.starts_with("}}"),
        Context::LinkTarget => c == '|' || c == ']',
        Context::LinkDisplay => rest.starts_with("]]"),
        Context::ExtDisplay => c == ']',
    }
}

/// Parse whatever construct starts at the current position, degrading to a
/// single literal character when none matches.
fn construct(input: &mut &str, base: &str) -> ModalResult<AstNode> {
    if input.starts_with('$') {
        if let Some(node) = attempt(input, param_ref)? {
            return Ok(node);
        }
    } else if input.starts_with('{') {
        if let Some(node) = attempt(input, |i| template(i, base))? {
            return Ok(node);
        }
    } else if input.starts_with('[') {
        if let Some(node) = attempt(input, |i| wikilink(i, base))? {
            return Ok(node);
        }
        if let Some(node) = attempt(input, |i| extlink(i, base))? {
            return Ok(node);
        }
    }
    single_char(input)
}

/// Run a sub-parser, resetting the input on backtrack. Committed (cut)
/// errors propagate.
fn attempt(
    input: &mut &str,
    parser: impl FnOnce(&mut &str) -> ModalResult<AstNode>,
) -> ModalResult<Option<AstNode>> {
    let start = *input;
    match parser(input) {
        Ok(node) => Ok(Some(node)),
        Err(ErrMode::Backtrack(_)) => {
            *input = start;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn single_char(input: &mut &str) -> ModalResult<AstNode> {
    any.parse_next(input)
        .map(|c: char| AstNode::Literal(c.to_string()))
}

/// `$` followed by digits. `$` before a non-digit backtracks to literal
/// text.
fn param_ref(input: &mut &str) -> ModalResult<AstNode> {
    let _ = '$'.parse_next(input)?;
    let digits: &str = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    match digits.parse::<usize>() {
        Ok(index) => Ok(AstNode::ParamRef(index)),
        Err(_) => Err(backtrack()),
    }
}

/// `{{NAME}}` or `{{NAME:arg|arg|...}}`.
///
/// The parser is committed once `{{NAME:` has been consumed; after that a
/// missing `}}` is a positioned parse error rather than literal fallback.
fn template(input: &mut &str, base: &str) -> ModalResult<AstNode> {
    let start = *input;
    if !input.starts_with("{{") {
        return Err(backtrack());
    }
    *input = &input[2..];
    let parsed_name: ModalResult<&str> = take_while(1.., is_name_char).parse_next(input);
    let name = match parsed_name {
        Ok(name) => name.to_string(),
        Err(_) => {
            *input = start;
            return Err(backtrack());
        }
    };
    if input.starts_with("}}") {
        *input = &input[2..];
        return Ok(AstNode::TemplateCall {
            name,
            args: Vec::new(),
        });
    }
    if !input.starts_with(':') {
        *input = start;
        return Err(backtrack());
    }
    *input = &input[1..];
    let mut args = Vec::new();
    loop {
        let arg_nodes = match sequence(input, Context::TemplateArg, base) {
            Ok(nodes) => nodes,
            Err(e) => {
                *input = start;
                return Err(e.cut());
            }
        };
        args.push(AstNode::seq(arg_nodes));
        if input.starts_with('|') {
            *input = &input[1..];
        } else {
            break;
        }
    }
    if !input.starts_with("}}") {
        *input = start;
        return Err(cut_error());
    }
    *input = &input[2..];
    Ok(AstNode::TemplateCall { name, args })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// `[[target]]` or `[[target|display]]`. Only the first `|` splits target
/// from display. An unclosed `[[` backtracks to literal text.
fn wikilink(input: &mut &str, base: &str) -> ModalResult<AstNode> {
    let start = *input;
    if !input.starts_with("[[") {
        return Err(backtrack());
    }
    let construct_start = base.len() - input.len();
    *input = &input[2..];
    let target_nodes = match sequence(input, Context::LinkTarget, base) {
        Ok(nodes) => nodes,
        Err(e) => {
            *input = start;
            return Err(e);
        }
    };
    if target_nodes.is_empty() {
        *input = start;
        return Err(backtrack());
    }
    let display = if input.starts_with('|') {
        *input = &input[1..];
        let display_nodes = match sequence(input, Context::LinkDisplay, base) {
            Ok(nodes) => nodes,
            Err(e) => {
                *input = start;
                return Err(e);
            }
        };
        if display_nodes.is_empty() {
            let offset = base[..construct_start].chars().count();
            LinkDisplay::PipeTrick { offset }
        } else {
            LinkDisplay::Display(Box::new(AstNode::seq(display_nodes)))
        }
    } else {
        LinkDisplay::Target
    };
    if !input.starts_with("]]") {
        *input = start;
        return Err(backtrack());
    }
    *input = &input[2..];
    Ok(AstNode::Link {
        target: Box::new(AstNode::seq(target_nodes)),
        display,
        external: false,
    })
}

/// `[url display text]`. The URL must carry a known scheme so bracketed
/// prose is not linkified; anything else backtracks to literal text.
fn extlink(input: &mut &str, base: &str) -> ModalResult<AstNode> {
    let start = *input;
    if !input.starts_with('[') || input.starts_with("[[") {
        return Err(backtrack());
    }
    *input = &input[1..];
    let parsed_url: ModalResult<&str> = take_while(1.., is_url_char).parse_next(input);
    let url = match parsed_url {
        Ok(url) => url,
        Err(_) => {
            *input = start;
            return Err(backtrack());
        }
    };
    if !has_known_scheme(url) {
        *input = start;
        return Err(backtrack());
    }
    let url = url.to_string();
    let ws: ModalResult<&str> = take_while(1.., |c: char| c.is_whitespace()).parse_next(input);
    if ws.is_err() {
        *input = start;
        return Err(backtrack());
    }
    let display_nodes = match sequence(input, Context::ExtDisplay, base) {
        Ok(nodes) => nodes,
        Err(e) => {
            *input = start;
            return Err(e);
        }
    };
    if !input.starts_with(']') {
        *input = start;
        return Err(backtrack());
    }
    *input = &input[1..];
    let display = if display_nodes.is_empty() {
        LinkDisplay::Target
    } else {
        LinkDisplay::Display(Box::new(AstNode::seq(display_nodes)))
    };
    Ok(AstNode::Link {
        target: Box::new(AstNode::Literal(url)),
        display,
        external: true,
    })
}

fn is_url_char(c: char) -> bool {
    !c.is_whitespace() && c != ']' && c != '['
}

fn has_known_scheme(url: &str) -> bool {
    ["http://", "https://", "ftp://", "mailto:", "//"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// Append a literal, merging with a preceding literal node.
fn push_literal(nodes: &mut Vec<AstNode>, text: String) {
    if let Some(AstNode::Literal(prev)) = nodes.last_mut() {
        prev.push_str(&text);
    } else {
        nodes.push(AstNode::Literal(text));
    }
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn cut_error() -> ErrMode<ContextError> {
    ErrMode::Cut(ContextError::new())
}
