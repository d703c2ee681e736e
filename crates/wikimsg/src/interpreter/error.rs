//! Error and warning types for the message engine.

use std::cmp::Ordering;
use std::path::PathBuf;

use thiserror::Error;

/// A caller-visible hard failure.
///
/// The render pipeline itself never fails - malformed translations degrade
/// to visible placeholders - so the only hard error is API misuse, which
/// indicates a caller bug rather than untrusted content.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Positional arguments and `RenderOptions::args` were both supplied.
    #[error("conflicting argument forms: positional arguments and options args were both supplied")]
    ConflictingArguments,
}

/// Errors that occur during message-bundle loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a bundle file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed bundle content with location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Attempted to reload messages that were loaded from a string.
    #[error("cannot reload '{language}': was loaded from string, not file")]
    NoPathForReload { language: String },
}

/// A non-fatal problem observed while rendering.
///
/// Warnings are collected on the evaluation context and drained per render;
/// the output itself carries a visible placeholder for each.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderWarning {
    /// A message key (top-level or nested) had no entry in the store.
    #[error("message not found: '{key}', suggestions: {}", suggestions.join(", "))]
    MissingMessage {
        key: String,
        suggestions: Vec<String>,
    },

    /// A PLURAL count did not parse as a number; the last form was used.
    #[error("'{value}' is not a number for PLURAL")]
    BadPluralOperand { value: String },

    /// A grammar case exists for the locale but has no form for this word.
    #[error("no '{case}' form for '{word}'")]
    MissingGrammarForm { word: String, case: String },

    /// Nested message expansion exceeded the depth limit.
    #[error("maximum message nesting depth exceeded at '{key}'")]
    RecursionLimit { key: String },

    /// Nested message expansion looped back on itself.
    #[error("cyclic message reference: {}", chain.join(" -> "))]
    CyclicMessage { chain: Vec<String> },
}

/// Compute "did you mean" suggestions for an unresolved name.
///
/// Returns up to three candidates from `available` ranked by string
/// similarity, dropping anything too distant to be a plausible typo.
pub fn compute_suggestions(input: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = available
        .iter()
        .map(|candidate| (strsim::jaro_winkler(input, candidate), candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
