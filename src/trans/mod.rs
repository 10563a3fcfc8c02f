//! Bidirectional transcoding between content trees and translation templates.
//!
//! # Architecture
//!
//! - `node`: the input tree (`ContentNode`) and shared tree utilities
//! - `keep`: tags that round-trip literally (`KeepSet`)
//! - `canonicalize`: tree -> template + interpolation table
//! - `markup`: forgiving parser for translated templates
//! - `render`: template + original tree -> fresh render tree
//! - `diagnostics`: non-fatal anomaly reporting
//!
//! # Example
//!
//! ```rust
//! use trans_tree::i18n::TranslationStore;
//! use trans_tree::trans::{ContentNode, Element, LogReporter, Trans};
//!
//! let mut store =
//!     TranslationStore::from_json(r#"{"es": {"greeting": "Hola <1>{{name}}</1>"}}"#).unwrap();
//! store.set_language("es");
//!
//! let children = vec![
//!     ContentNode::text("Hello "),
//!     Element::new("strong").with_child(ContentNode::var("name", "Henry")).into(),
//! ];
//! let nodes = Trans::new("greeting").render(&store, &children, &mut LogReporter);
//! let html: String = nodes.iter().map(ToString::to_string).collect();
//! assert_eq!(html, "Hola <strong>Henry</strong>");
//! ```

mod canonicalize;
mod diagnostics;
mod keep;
mod markup;
mod node;
mod render;

pub use canonicalize::{canonicalize, Canonical};
pub use diagnostics::{Diagnostic, LogReporter, Reporter};
pub use keep::KeepSet;
pub use markup::{parse as parse_markup, MarkupNode, MarkupTag};
pub use node::{
    collect_interpolations, sequence_from_json, value_to_text, Attributes, ContentNode, Element,
    InterpolationTable,
};
pub use render::{interpolate, render, RenderElement, RenderNode};

use crate::i18n::Lookup;
use tracing::debug;

/// What to render when the lookup falls back to the key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fallback {
    Text(String),
    Source,
}

/// A translatable block: a key plus the options used to render it.
///
/// Rendering canonicalizes the children (for the interpolation table and an
/// optional source fallback), looks the key up, and rebuilds the children
/// from the translated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trans {
    key: String,
    keep: KeepSet,
    default: Option<Fallback>,
}

impl Trans {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            keep: KeepSet::default(),
            default: None,
        }
    }

    /// Use a different set of literally kept tags.
    pub fn keep_set(mut self, keep: KeepSet) -> Self {
        self.keep = keep;
        self
    }

    /// Template to use when the key has no translation.
    pub fn default_value(mut self, template: impl Into<String>) -> Self {
        self.default = Some(Fallback::Text(template.into()));
        self
    }

    /// Render the children's own canonical template when the key has no translation.
    pub fn fallback_to_source(mut self) -> Self {
        self.default = Some(Fallback::Source);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical template for `children` under this block's keep set.
    pub fn canonicalize(&self, children: &[ContentNode], reporter: &mut dyn Reporter) -> Canonical {
        canonicalize(children, &self.keep, reporter)
    }

    /// Look up the translation and rebuild `children` from it.
    pub fn render<L: Lookup + ?Sized>(
        &self,
        lookup: &L,
        children: &[ContentNode],
        reporter: &mut dyn Reporter,
    ) -> Vec<RenderNode> {
        let canonical = canonicalize(children, &self.keep, reporter);
        let translated = lookup.lookup(&self.key);

        let template = if translated == self.key {
            match &self.default {
                Some(Fallback::Text(template)) => template.clone(),
                Some(Fallback::Source) => canonical.template.clone(),
                None => translated,
            }
        } else {
            translated
        };
        debug!(key = %self.key, template = %template, "Rendering translation");

        render(children, &template, &canonical.table, &self.keep, reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::TranslationStore;

    fn alert_children() -> Vec<ContentNode> {
        vec![
            ContentNode::text("Hello "),
            Element::new("strong")
                .with_child(ContentNode::var("name", "Henry"))
                .into(),
            ContentNode::text(", you have "),
            ContentNode::var("count", 21),
            ContentNode::text(" unread message. "),
            Element::new("Link")
                .with_attr("to", "/msgs")
                .with_child("Go to messages.")
                .into(),
        ]
    }

    fn markup(nodes: &[RenderNode]) -> String {
        nodes.iter().map(ToString::to_string).collect()
    }

    fn spanish_store() -> TranslationStore {
        let mut store = TranslationStore::from_json(
            r#"{"es": {"alert": "Hola <1>{{name}}</1>, tienes {{count}} mensajes. <5>Ir a mensajes.</5>"}}"#,
        )
        .expect("Should parse resources");
        store.set_language("es");
        store
    }

    #[test]
    fn test_render_translated() {
        let store = spanish_store();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let nodes = Trans::new("alert").render(&store, &alert_children(), &mut diagnostics);

        assert_eq!(
            markup(&nodes),
            r#"Hola <strong>Henry</strong>, tienes 21 mensajes. <Link to="/msgs">Ir a mensajes.</Link>"#
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_key_renders_key_by_default() {
        let store = spanish_store();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let nodes = Trans::new("nope").render(&store, &alert_children(), &mut diagnostics);
        assert_eq!(nodes, vec![RenderNode::Text("nope".to_string())]);
    }

    #[test]
    fn test_missing_key_falls_back_to_source() {
        let store = spanish_store();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let nodes = Trans::new("nope")
            .fallback_to_source()
            .render(&store, &alert_children(), &mut diagnostics);
        assert_eq!(
            markup(&nodes),
            r#"Hello <strong>Henry</strong>, you have 21 unread message. <Link to="/msgs">Go to messages.</Link>"#
        );
    }

    #[test]
    fn test_missing_key_uses_default_value() {
        let lookup = |key: &str| key.to_string();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let nodes = Trans::new("nope")
            .default_value("Hi <1>{{name}}</1>")
            .render(&lookup, &alert_children(), &mut diagnostics);
        assert_eq!(markup(&nodes), "Hi <strong>Henry</strong>");
    }

    #[test]
    fn test_custom_keep_set() {
        let lookup = |_: &str| "a<em>b</em>".to_string();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let trans = Trans::new("k").keep_set(KeepSet::new(["em"]));
        let nodes = trans.render(&lookup, &[], &mut diagnostics);

        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[1], RenderNode::Element(e) if e.tag == "em"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_canonicalize_through_trans() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let canonical = Trans::new("alert").canonicalize(&alert_children(), &mut diagnostics);
        assert_eq!(
            canonical.template,
            "Hello <1>{{name}}</1>, you have {{count}} unread message. <5>Go to messages.</5>"
        );
        assert_eq!(Trans::new("alert").key(), "alert");
    }
}
