//! Non-fatal anomalies and the sink they are reported to.
//!
//! Translation text is authored outside the program, so nothing in the
//! transcoder fails. Every anomaly becomes a [`Diagnostic`] handed to a
//! caller-supplied [`Reporter`], and processing continues with a best-effort
//! result.

use thiserror::Error;
use tracing::warn;

/// Everything the canonicalizer, parser and reconstructor can complain about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// An interpolation node bound zero or several variables.
    #[error("interpolation node must bind exactly one variable, found {entries} ({names})")]
    MalformedInterpolation { entries: usize, names: String },

    /// A bare value was passed where an interpolation object was expected.
    #[error(
        "invalid child `{value}`: pass variables for interpolation as objects like {{{{name}}}}"
    )]
    InvalidShorthand { value: String },

    /// The template referenced a sibling index the original children do not have.
    #[error("template references child <{index}> but only {available} children exist")]
    MissingIndex { index: usize, available: usize },

    /// A `{{name}}` token had no bound value; it is left as literal text.
    #[error("no value bound for interpolation token `{name}`")]
    UnboundToken { name: String },

    /// The template introduced a tag that is neither an index nor kept.
    #[error("unknown tag <{name}> echoed as literal text")]
    UnknownTag { name: String },

    /// A closing tag had no matching open tag and was dropped.
    #[error("closing tag </{name}> has no matching open tag")]
    StrayClosingTag { name: String },

    /// A tag was still open when its parent (or the input) ended.
    #[error("tag <{name}> was never closed")]
    UnclosedTag { name: String },
}

impl Diagnostic {
    /// Stable short name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MalformedInterpolation { .. } => "malformed_interpolation",
            Diagnostic::InvalidShorthand { .. } => "invalid_shorthand",
            Diagnostic::MissingIndex { .. } => "missing_index",
            Diagnostic::UnboundToken { .. } => "unbound_token",
            Diagnostic::UnknownTag { .. } => "unknown_tag",
            Diagnostic::StrayClosingTag { .. } => "stray_closing_tag",
            Diagnostic::UnclosedTag { .. } => "unclosed_tag",
        }
    }

    /// Whether the anomaly comes from unbalanced markup in a template.
    pub fn is_markup_error(&self) -> bool {
        matches!(
            self,
            Diagnostic::StrayClosingTag { .. } | Diagnostic::UnclosedTag { .. }
        )
    }
}

/// Receives diagnostics as they happen.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(kind = diagnostic.kind(), "Trans: {}", diagnostic);
    }
}

/// Collects diagnostics, mainly so tests can assert on them.
impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
