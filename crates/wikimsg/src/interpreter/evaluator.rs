//! AST evaluation against concrete arguments and a language profile.
//!
//! The evaluator walks a parsed message tree and produces the escaped
//! output tree. It is infallible by design: a missing argument leaves the
//! `$n` token visible, a missing nested message renders as a bracketed
//! placeholder, a bad PLURAL operand falls back to the last form. One
//! malformed translation string must never break a page render; every
//! failure mode degrades to something visible and debuggable, recorded as
//! a [`RenderWarning`] on the context.

use crate::interpreter::context::EvalContext;
use crate::interpreter::error::{RenderWarning, compute_suggestions};
use crate::parser::ast::{AstNode, LinkDisplay};
use crate::parser::{error_message, parse};
use crate::types::{Gender, Rendered, Value, escape_html};

/// The message being evaluated: its key, raw source (for inline
/// diagnostics), and positional arguments. Nested message expansion gets a
/// fresh frame; the context is shared.
pub(crate) struct Frame<'f> {
    pub key: &'f str,
    pub source: &'f str,
    pub args: &'f [Value],
}

/// Parse and evaluate a raw message string.
pub(crate) fn eval_message(
    ctx: &mut EvalContext<'_>,
    key: &str,
    source: &str,
    args: &[Value],
) -> Rendered {
    let ast = parse(key, source);
    eval_node(&ast, &Frame { key, source, args }, ctx)
}

/// Evaluate a single AST node into the output tree.
pub(crate) fn eval_node(node: &AstNode, frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Rendered {
    match node {
        AstNode::Literal(text) => Rendered::escaped(text.clone()),
        AstNode::ParamRef(index) => eval_param(*index, frame),
        AstNode::TemplateCall { name, args } => eval_template_call(name, args, frame, ctx),
        AstNode::Link {
            target,
            display,
            external,
        } => eval_link(target, display, *external, frame, ctx),
        AstNode::Concat(children) => Rendered::Seq(
            children
                .iter()
                .map(|child| eval_node(child, frame, ctx))
                .collect(),
        ),
    }
}

/// Flatten a node to plain text (construct operands: counts, case names,
/// link targets).
fn plain(node: &AstNode, frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> String {
    eval_node(node, frame, ctx).to_plain()
}

/// Positional substitution. An out-of-range index leaves the original
/// token visible so partially-translated messages still render.
fn eval_param(index: usize, frame: &Frame<'_>) -> Rendered {
    if index == 0 || index > frame.args.len() {
        return Rendered::escaped(format!("${index}"));
    }
    match &frame.args[index - 1] {
        Value::Text(s) => Rendered::escaped(s.clone()),
        Value::Number(n) => Rendered::escaped(n.to_string()),
        Value::Float(f) => Rendered::escaped(f.to_string()),
        Value::Markup(m) => Rendered::raw(m.clone()),
        Value::User(u) => Rendered::escaped(u.name().to_string()),
    }
}

fn eval_template_call(
    name: &str,
    args: &[AstNode],
    frame: &Frame<'_>,
    ctx: &mut EvalContext<'_>,
) -> Rendered {
    match name.to_ascii_lowercase().as_str() {
        "plural" => eval_plural(args, frame, ctx),
        "gender" => eval_gender(args, frame, ctx),
        "grammar" => eval_grammar(args, frame, ctx),
        "formatnum" => eval_formatnum(args, frame, ctx),
        "int" => match args.first() {
            Some(key_node) => {
                let key = plain(key_node, frame, ctx);
                eval_nested(key.trim(), &[], ctx)
            }
            None => Rendered::escaped("[int]"),
        },
        "sitename" => Rendered::escaped(ctx.site_name().to_string()),
        _ => eval_unknown_name(name, args, frame, ctx),
    }
}

/// `{{PLURAL:count|form|form|...}}`.
///
/// Forms are matched positionally against the locale's plural category
/// order; an `N=` prefix marks an explicit form for an exact count. A
/// category with no corresponding form, or an unparseable count, falls
/// back to the last supplied form.
fn eval_plural(args: &[AstNode], frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Rendered {
    let Some((count_node, forms)) = args.split_first() else {
        return Rendered::empty();
    };
    if forms.is_empty() {
        return Rendered::empty();
    }

    let raw_count = plain(count_node, frame, ctx);
    let canonical = ctx.profile().parse_number(raw_count.trim());

    let mut explicit: Vec<(i64, AstNode)> = Vec::new();
    let mut ordered: Vec<AstNode> = Vec::new();
    for form in forms {
        match explicit_form(form) {
            Some((n, node)) => explicit.push((n, node)),
            None => ordered.push(form.clone()),
        }
    }

    let chosen = match canonical.parse::<f64>() {
        Ok(value) => {
            let truncated = value as i64;
            let exact = if value.fract() == 0.0 {
                explicit
                    .iter()
                    .find(|(n, _)| *n == truncated)
                    .map(|(_, node)| node.clone())
            } else {
                None
            };
            match exact {
                Some(node) => Some(node),
                None => {
                    let index = ctx.profile().plural_index(truncated);
                    ordered.get(index).or_else(|| ordered.last()).cloned()
                }
            }
        }
        Err(_) => {
            ctx.add_warning(RenderWarning::BadPluralOperand {
                value: raw_count.trim().to_string(),
            });
            ordered.last().cloned()
        }
    };

    match chosen.or_else(|| explicit.last().map(|(_, node)| node.clone())) {
        Some(node) => eval_node(&node, frame, ctx),
        None => Rendered::empty(),
    }
}

/// Split an `N=form` explicit plural form into its count and content.
fn explicit_form(form: &AstNode) -> Option<(i64, AstNode)> {
    let (first_text, tail): (&str, &[AstNode]) = match form {
        AstNode::Literal(s) => (s.as_str(), &[]),
        AstNode::Concat(children) => match children.first() {
            Some(AstNode::Literal(s)) => (s.as_str(), &children[1..]),
            _ => return None,
        },
        _ => return None,
    };
    let eq = first_text.find('=')?;
    let digits = &first_text[..eq];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse().ok()?;
    let rest = &first_text[eq + 1..];
    let mut nodes = Vec::new();
    if !rest.is_empty() {
        nodes.push(AstNode::Literal(rest.to_string()));
    }
    nodes.extend(tail.iter().cloned());
    Some((n, AstNode::seq(nodes)))
}

/// `{{GENDER:subject|male|female|neutral}}`.
fn eval_gender(args: &[AstNode], frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Rendered {
    let Some((subject, forms)) = args.split_first() else {
        return Rendered::empty();
    };
    if forms.is_empty() {
        // GENDER with no forms collapses to nothing.
        return Rendered::empty();
    }
    let gender = resolve_gender(subject, frame, ctx);
    let index = match gender {
        Gender::Male => 0,
        Gender::Female => 1,
        Gender::Neutral => 2,
    };
    let form = forms.get(index).or_else(|| forms.last());
    match form {
        Some(node) => eval_node(node, frame, ctx),
        None => Rendered::empty(),
    }
}

/// A gender argument referencing a `Value::User` supplies the user's
/// gender; anything else is flattened to a keyword.
fn resolve_gender(subject: &AstNode, frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Gender {
    if let AstNode::ParamRef(index) = subject
        && *index >= 1
        && *index <= frame.args.len()
        && let Value::User(user) = &frame.args[index - 1]
    {
        return user.gender();
    }
    Gender::from_keyword(&plain(subject, frame, ctx))
}

/// `{{GRAMMAR:case|word}}`: locale grammar-table transform; an unsupported
/// case returns the word unchanged.
fn eval_grammar(args: &[AstNode], frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Rendered {
    let Some(case_node) = args.first() else {
        return Rendered::empty();
    };
    let Some(word_node) = args.get(1) else {
        return Rendered::empty();
    };
    let case = plain(case_node, frame, ctx);
    let case = case.trim();
    let word = plain(word_node, frame, ctx);
    let transformed = ctx.profile().grammar_case(&word, case);
    if transformed == word && ctx.profile().has_grammar_case(case) {
        ctx.add_warning(RenderWarning::MissingGrammarForm {
            word: word.clone(),
            case: case.to_string(),
        });
    }
    Rendered::escaped(transformed)
}

/// `{{formatnum:number}}` / `{{formatnum:number|R}}`.
fn eval_formatnum(args: &[AstNode], frame: &Frame<'_>, ctx: &mut EvalContext<'_>) -> Rendered {
    let Some(number_node) = args.first() else {
        return Rendered::empty();
    };
    let text = plain(number_node, frame, ctx);
    let text = text.trim();
    let reverse = args
        .get(1)
        .is_some_and(|flag| plain(flag, frame, ctx).trim() == "R");
    let out = if reverse {
        ctx.profile().parse_number(text)
    } else {
        ctx.profile().format_number(text)
    };
    Rendered::escaped(out)
}

/// Expand a nested message by key, re-entering the full pipeline.
fn eval_nested(key: &str, args: &[Value], ctx: &mut EvalContext<'_>) -> Rendered {
    let placeholder = || Rendered::escaped(format!("[{}]", key.to_lowercase()));
    match ctx.lookup(key) {
        Some(raw) => {
            if !ctx.push_call(key) {
                return placeholder();
            }
            let result = eval_message(ctx, key, raw, args);
            ctx.pop_call();
            result
        }
        None => {
            let available = ctx.message_keys();
            ctx.add_warning(RenderWarning::MissingMessage {
                key: key.to_string(),
                suggestions: compute_suggestions(key, &available),
            });
            placeholder()
        }
    }
}

/// An unrecognized construct name is tried as a nested message key (with
/// the call's evaluated arguments); with no resolvable message it renders
/// as a visible `[name]` placeholder.
fn eval_unknown_name(
    name: &str,
    args: &[AstNode],
    frame: &Frame<'_>,
    ctx: &mut EvalContext<'_>,
) -> Rendered {
    let resolved = if ctx.lookup(name).is_some() {
        Some(name.to_string())
    } else {
        let lowered = lowercase_first(name);
        if lowered != name && ctx.lookup(&lowered).is_some() {
            Some(lowered)
        } else {
            None
        }
    };
    match resolved {
        Some(key) => {
            let values: Vec<Value> = args
                .iter()
                .map(|arg| {
                    let rendered = eval_node(arg, frame, ctx);
                    if rendered.contains_raw() {
                        Value::Markup(rendered.to_html())
                    } else {
                        Value::Text(rendered.to_plain())
                    }
                })
                .collect();
            eval_nested(&key, &values, ctx)
        }
        None => {
            let available = ctx.message_keys();
            ctx.add_warning(RenderWarning::MissingMessage {
                key: name.to_string(),
                suggestions: compute_suggestions(name, &available),
            });
            Rendered::escaped(format!("[{}]", name.to_lowercase()))
        }
    }
}

fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a link construct as a raw anchor with escaped interior text.
fn eval_link(
    target: &AstNode,
    display: &LinkDisplay,
    external: bool,
    frame: &Frame<'_>,
    ctx: &mut EvalContext<'_>,
) -> Rendered {
    let target_text = plain(target, frame, ctx);
    let target_text = target_text.trim();
    let display_html = match display {
        LinkDisplay::PipeTrick { offset } => {
            // Display inference needs title normalization the engine does
            // not own; surface the positioned diagnostic instead.
            return Rendered::escaped(error_message(frame.key, frame.source, *offset));
        }
        LinkDisplay::Target => escape_html(target_text),
        LinkDisplay::Display(node) => eval_node(node, frame, ctx).to_html(),
    };
    let html = if external {
        format!(
            "<a href=\"{}\">{}</a>",
            escape_html(target_text),
            display_html
        )
    } else {
        let href = ctx.resolver().url_for(target_text);
        format!(
            "<a href=\"{}\" title=\"{}\">{}</a>",
            escape_html(&href),
            escape_html(target_text),
            display_html
        )
    };
    Rendered::raw(html)
}
