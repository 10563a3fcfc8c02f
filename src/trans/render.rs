//! Rebuild a renderable tree from a translated template and the original children.
//!
//! The translated string is interpolated, wrapped in a synthetic `<0>` root,
//! and parsed. The root's content is then walked in lockstep with the
//! original children:
//!
//! - text in the template is emitted as text
//! - `<i>` refers to the original sibling at index `i`, which is cloned with
//!   the translated content mapped into it
//! - kept tags (`<br/>`, `<strong>`) are synthesized fresh
//! - any other tag is echoed back as literal markup text
//!
//! Nothing here fails; anomalies are reported and degrade to a best guess.

use crate::trans::diagnostics::{Diagnostic, Reporter};
use crate::trans::keep::KeepSet;
use crate::trans::markup::{self, MarkupNode, MarkupTag};
use crate::trans::node::{
    collect_interpolations, value_to_text, Attributes, ContentNode, Element, InterpolationTable,
};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Regex for `{{name}}` tokens (cached)
static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// One unit of reconstructed output.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Text(String),
    Element(RenderElement),
    /// Literal markup echoed for tags the original tree has no node for.
    Markup(String),
}

/// A freshly built element. Never aliases the original tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderElement {
    /// Empty for a placeholder standing in for a missing original child.
    pub tag: String,
    /// Sibling key: `"i"` for positional references, `"tag-i"` for kept tags.
    pub key: String,
    pub attrs: Attributes,
    pub children: Vec<RenderNode>,
}

impl RenderElement {
    /// Whether this element stands in for an index the original children lacked.
    pub fn is_placeholder(&self) -> bool {
        self.tag.is_empty()
    }
}

impl RenderNode {
    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            RenderNode::Text(text) | RenderNode::Markup(text) => text.clone(),
            RenderNode::Element(element) => element
                .children
                .iter()
                .map(RenderNode::text_content)
                .collect(),
        }
    }

    /// Convert an original node without any translated content applied.
    fn from_content(node: &ContentNode, key: String) -> Option<RenderNode> {
        match node {
            ContentNode::Text(text) => Some(RenderNode::Text(text.clone())),
            ContentNode::Element(element) => Some(RenderNode::Element(RenderElement {
                tag: element.tag.clone(),
                key,
                attrs: element.attrs.clone(),
                children: element
                    .children
                    .iter()
                    .enumerate()
                    .filter_map(|(i, child)| RenderNode::from_content(child, i.to_string()))
                    .collect(),
            })),
            ContentNode::Interpolation(entries) if entries.len() == 1 => {
                entries.values().next().map(|v| RenderNode::Text(value_to_text(v)))
            }
            ContentNode::Interpolation(_) | ContentNode::Scalar(_) => None,
        }
    }
}

impl fmt::Display for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNode::Text(text) | RenderNode::Markup(text) => f.write_str(text),
            RenderNode::Element(element) => fmt::Display::fmt(element, f),
        }
    }
}

impl fmt::Display for RenderElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            return self
                .children
                .iter()
                .try_for_each(|child| write!(f, "{}", child));
        }
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        if self.children.is_empty() {
            return f.write_str(" />");
        }
        f.write_str(">")?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Reconstruct `children` according to the translated `template`.
///
/// `table` supplies values for `{{name}}` tokens; bindings found in
/// `children` themselves are used for any name `table` does not bind, so the
/// table may be empty when the children carry their own interpolations.
pub fn render(
    children: &[ContentNode],
    template: &str,
    table: &InterpolationTable,
    keep: &KeepSet,
    reporter: &mut dyn Reporter,
) -> Vec<RenderNode> {
    if template.is_empty() {
        return Vec::new();
    }

    let needs_markup = keep.appears_in(template);
    if children.is_empty() && !needs_markup {
        return vec![RenderNode::Text(template.to_string())];
    }

    let mut context = InterpolationTable::new();
    collect_interpolations(children, &mut context);
    context.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));

    let interpolated = interpolate(template, &context, reporter);
    debug!(template = %template, interpolated = %interpolated, "Reconstructing translation");

    // The parser sees one top-level container. Anything after a stray `</0>`
    // that closed it early is outside the translation and is dropped.
    let ast = markup::parse(&format!("<0>{}</0>", interpolated), reporter);
    let root = ast.iter().find_map(|node| match node {
        MarkupNode::Tag(tag) => Some(tag),
        MarkupNode::Text(_) => None,
    });

    let mut mapper = Mapper { keep, reporter };
    match root {
        Some(root) => mapper.map_children(children, &root.children),
        None => Vec::new(),
    }
}

/// Replace every `{{name}}` with its bound value. Unbound tokens become the bare name.
pub fn interpolate(
    template: &str,
    table: &InterpolationTable,
    reporter: &mut dyn Reporter,
) -> String {
    let regex = TOKEN_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap());

    regex
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match table.get(name) {
                Some(value) => value_to_text(value),
                None => {
                    reporter.report(Diagnostic::UnboundToken {
                        name: name.to_string(),
                    });
                    name.to_string()
                }
            }
        })
        .into_owned()
}

fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Too large to address anything; still positional, just missing.
    Some(name.parse().unwrap_or(usize::MAX))
}

struct Mapper<'a> {
    keep: &'a KeepSet,
    reporter: &'a mut dyn Reporter,
}

impl Mapper<'_> {
    fn map(&mut self, siblings: &[ContentNode], ast: &[MarkupNode]) -> Vec<RenderNode> {
        let mut out = Vec::with_capacity(ast.len());

        for (position, node) in ast.iter().enumerate() {
            let tag = match node {
                MarkupNode::Text(text) => {
                    out.push(RenderNode::Text(text.clone()));
                    continue;
                }
                MarkupNode::Tag(tag) => tag,
            };

            if let Some(index) = parse_index(&tag.name) {
                self.positional(siblings, index, position, tag, &mut out);
            } else if self.keep.contains(&tag.name) {
                out.push(self.synthesize(siblings, position, tag));
            } else {
                out.push(self.echo(siblings, tag));
            }
        }

        out
    }

    fn positional(
        &mut self,
        siblings: &[ContentNode],
        index: usize,
        position: usize,
        tag: &MarkupTag,
        out: &mut Vec<RenderNode>,
    ) {
        let original = match siblings.get(index) {
            Some(node) => Cow::Borrowed(node),
            None => {
                self.reporter.report(Diagnostic::MissingIndex {
                    index,
                    available: siblings.len(),
                });
                Cow::Owned(ContentNode::Element(Element::default()))
            }
        };

        match &*original {
            ContentNode::Text(text) => out.push(RenderNode::Text(text.clone())),
            ContentNode::Element(element) => {
                let rebuilt = self.clone_element(element, position, tag);
                out.push(RenderNode::Element(rebuilt));
            }
            // Already interpolated upfront: keep whatever text the translator put there.
            ContentNode::Interpolation(_) | ContentNode::Scalar(_) => {
                if let Some(text) = tag.first_text().filter(|text| !text.is_empty()) {
                    out.push(RenderNode::Text(text.to_string()));
                }
            }
        }
    }

    /// Map translated content onto `originals`. When the translation leaves
    /// nothing and every original child is an element, the originals are kept.
    fn map_children(&mut self, originals: &[ContentNode], ast: &[MarkupNode]) -> Vec<RenderNode> {
        let mapped = self.map(originals, ast);
        let all_elements = originals
            .iter()
            .all(|child| matches!(child, ContentNode::Element(_)));
        if !mapped.is_empty() || !all_elements {
            return mapped;
        }
        originals
            .iter()
            .enumerate()
            .filter_map(|(i, child)| RenderNode::from_content(child, i.to_string()))
            .collect()
    }

    fn clone_element(
        &mut self,
        element: &Element,
        position: usize,
        tag: &MarkupTag,
    ) -> RenderElement {
        let mut attrs = element.attrs.clone();
        attrs.extend(tag.attrs.iter().map(|(k, v)| (k.clone(), v.clone())));

        let children = if element.has_children() {
            self.map_children(&element.children, &tag.children)
        } else if let Some(text) = tag.text_child() {
            vec![RenderNode::Text(text.to_string())]
        } else {
            Vec::new()
        };

        RenderElement {
            tag: element.tag.clone(),
            key: position.to_string(),
            attrs,
            children,
        }
    }

    fn synthesize(
        &mut self,
        siblings: &[ContentNode],
        position: usize,
        tag: &MarkupTag,
    ) -> RenderNode {
        let children = if tag.void_element {
            Vec::new()
        } else {
            self.map(siblings, &tag.children)
        };

        RenderNode::Element(RenderElement {
            tag: tag.name.clone(),
            key: format!("{}-{}", tag.name, position),
            attrs: tag.attrs.clone(),
            children,
        })
    }

    fn echo(&mut self, siblings: &[ContentNode], tag: &MarkupTag) -> RenderNode {
        self.reporter.report(Diagnostic::UnknownTag {
            name: tag.name.clone(),
        });

        if tag.void_element {
            return RenderNode::Markup(format!("<{} />", tag.name));
        }
        let inner: String = self
            .map(siblings, &tag.children)
            .iter()
            .map(ToString::to_string)
            .collect();
        RenderNode::Markup(format!("<{name}>{inner}</{name}>", name = tag.name))
    }
}
