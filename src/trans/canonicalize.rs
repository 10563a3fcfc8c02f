//! Flatten a content tree into a canonical translation template.
//!
//! ```text
//! [ "Hello ", <strong>{name}</strong>, ", you have ", {count}, " unread." ]
//!   -> "Hello <1>{{name}}</1>, you have {{count}} unread."
//!      + { name: "Henry", count: 21 }
//! ```
//!
//! Elements are addressed by their 0-based index among their siblings.
//! Kept tags (see [`KeepSet`]) without attributes are written literally when
//! they are empty or hold a single text child.

use crate::trans::diagnostics::{Diagnostic, Reporter};
use crate::trans::keep::KeepSet;
use crate::trans::markup::is_void_element;
use crate::trans::node::{value_to_text, ContentNode, Element, InterpolationTable};
use serde::Serialize;

/// A canonical template and the variable bindings found while building it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Canonical {
    pub template: String,
    pub table: InterpolationTable,
}

/// Canonicalize a child sequence.
///
/// Malformed interpolation nodes and bare scalars are reported and skipped.
/// The input is never modified.
pub fn canonicalize(
    children: &[ContentNode],
    keep: &KeepSet,
    reporter: &mut dyn Reporter,
) -> Canonical {
    let mut out = Canonical::default();

    for (index, child) in children.iter().enumerate() {
        match child {
            ContentNode::Text(text) => out.template.push_str(text),
            ContentNode::Element(element) => push_element(&mut out, index, element, keep, reporter),
            ContentNode::Interpolation(entries) => match entries.iter().next() {
                Some((name, value)) if entries.len() == 1 => {
                    out.table.insert(name.clone(), value.clone());
                    out.template.push_str(&format!("{{{{{}}}}}", name));
                }
                _ => reporter.report(Diagnostic::MalformedInterpolation {
                    entries: entries.len(),
                    names: entries.keys().cloned().collect::<Vec<_>>().join(", "),
                }),
            },
            ContentNode::Scalar(value) => reporter.report(Diagnostic::InvalidShorthand {
                value: value_to_text(value),
            }),
        }
    }

    out
}

fn push_element(
    out: &mut Canonical,
    index: usize,
    element: &Element,
    keep: &KeepSet,
    reporter: &mut dyn Reporter,
) {
    let literal = keep.contains(&element.tag) && element.attrs.is_empty();

    if !element.has_children() {
        if literal {
            // e.g. lorem <br/> ipsum
            out.template.push_str(&format!("<{}/>", element.tag));
        } else {
            // e.g. lorem <hr class="x"/> ipsum -> lorem <0></0> ipsum
            out.template.push_str(&format!("<{index}></{index}>"));
        }
        return;
    }

    // A void name would be read back without its text, so it stays indexed.
    if literal && !is_void_element(&element.tag) {
        if let Some(text) = element.single_text_child() {
            // e.g. dolor <strong>bold</strong> amet
            out.template
                .push_str(&format!("<{tag}>{text}</{tag}>", tag = element.tag));
            return;
        }
    }

    let inner = canonicalize(&element.children, keep, reporter);
    for (name, value) in inner.table {
        out.table.entry(name).or_insert(value);
    }
    out.template
        .push_str(&format!("<{index}>{}</{index}>", inner.template));
}
