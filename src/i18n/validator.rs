//! Translation quality validation module.
//!
//! Compares a translated template against the canonical source template and
//! flags placeholders and indexed elements that were lost or invented, plus
//! markup that does not balance.

use crate::trans::{parse_markup, Diagnostic, MarkupNode};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Problems that will render wrong: unknown references, unbalanced markup
    pub errors: Vec<String>,

    /// Source content the translation dropped
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for translated templates.
pub struct TemplateValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TemplateValidator {
    /// Validate `translated` against the canonical `source` template.
    ///
    /// - a `{{var}}` or `<N>` in the source but not the translation is a warning
    /// - a `{{var}}` or `<N>` in the translation but not the source is an error
    /// - stray or unclosed tags in the translation are errors
    ///
    /// `<N>` references are compared with their positional ancestors, since
    /// `<1>` inside `<0>` and a top-level `<1>` address different children.
    pub fn validate(source: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        let source_vars = Self::extract_placeholders(source);
        let translated_vars = Self::extract_placeholders(translated);
        for name in source_vars.difference(&translated_vars) {
            report
                .warnings
                .push(format!("Placeholder {{{{{}}}}} missing from translation", name));
        }
        for name in translated_vars.difference(&source_vars) {
            report
                .errors
                .push(format!("Unknown placeholder {{{{{}}}}} in translation", name));
        }

        let mut ignored: Vec<Diagnostic> = Vec::new();
        let source_indices = Self::extract_indices(&parse_markup(source, &mut ignored));
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let translated_indices = Self::extract_indices(&parse_markup(translated, &mut diagnostics));

        for path in source_indices.difference(&translated_indices) {
            report.warnings.push(format!(
                "Element {} missing from translation",
                format_path(path)
            ));
        }
        for path in translated_indices.difference(&source_indices) {
            report.errors.push(format!(
                "Unknown element {} in translation",
                format_path(path)
            ));
        }

        report.errors.extend(
            diagnostics
                .iter()
                .filter(|d| d.is_markup_error())
                .map(ToString::to_string),
        );

        report
    }

    /// Names of all `{{var}}` placeholders in a template
    fn extract_placeholders(template: &str) -> BTreeSet<String> {
        let regex =
            PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap());

        regex
            .captures_iter(template)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Every positional `<N>` reference, as the chain of indices leading to it.
    ///
    /// Kept and unknown tags do not open a new sibling array, so they are
    /// transparent here.
    fn extract_indices(nodes: &[MarkupNode]) -> BTreeSet<Vec<usize>> {
        let mut paths = BTreeSet::new();
        collect_indices(nodes, &mut Vec::new(), &mut paths);
        paths
    }
}

fn collect_indices(nodes: &[MarkupNode], path: &mut Vec<usize>, into: &mut BTreeSet<Vec<usize>>) {
    for node in nodes {
        let MarkupNode::Tag(tag) = node else {
            continue;
        };
        match index_of(&tag.name) {
            Some(index) => {
                path.push(index);
                into.insert(path.clone());
                collect_indices(&tag.children, path, into);
                path.pop();
            }
            None => collect_indices(&tag.children, path, into),
        }
    }
}

fn index_of(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(name.parse().unwrap_or(usize::MAX))
}

/// `[0, 1]` -> `<0><1>`
fn format_path(path: &[usize]) -> String {
    path.iter().map(|index| format!("<{}>", index)).collect()
}
