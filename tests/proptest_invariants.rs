//! Property-based invariant tests for the transcoder.
//!
//! 1. Rendering a tree's own canonical template rebuilds an equivalent tree
//! 2. Canonicalization is deterministic and reports nothing for well-formed trees
//! 3. An empty template always renders nothing
//! 4. The markup parser never panics on arbitrary input
//! 5. Rendering never panics on arbitrary templates
//! 6. The validator accepts any template against itself

use proptest::prelude::*;
use trans_tree::i18n::TemplateValidator;
use trans_tree::trans::{
    canonicalize, parse_markup, render, value_to_text, Attributes, ContentNode, Diagnostic,
    Element, InterpolationTable, KeepSet, RenderNode,
};

// ==================== Helpers ====================

/// Structural view shared by input and output trees.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Text(String),
    Element {
        tag: String,
        attrs: Attributes,
        children: Vec<Shape>,
    },
    Markup(String),
}

/// Merge adjacent text and drop empty text, the way the template flattens it.
fn push_text(out: &mut Vec<Shape>, text: String) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Shape::Text(prev)) => prev.push_str(&text),
        _ => out.push(Shape::Text(text)),
    }
}

fn shape_content(nodes: &[ContentNode]) -> Vec<Shape> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            ContentNode::Text(text) => push_text(&mut out, text.clone()),
            ContentNode::Interpolation(entries) => {
                if let Some(value) = entries.values().next() {
                    push_text(&mut out, value_to_text(value));
                }
            }
            ContentNode::Element(element) => out.push(Shape::Element {
                tag: element.tag.clone(),
                attrs: element.attrs.clone(),
                children: shape_content(&element.children),
            }),
            ContentNode::Scalar(_) => {}
        }
    }
    out
}

fn shape_render(nodes: &[RenderNode]) -> Vec<Shape> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            RenderNode::Text(text) => push_text(&mut out, text.clone()),
            RenderNode::Element(element) => out.push(Shape::Element {
                tag: element.tag.clone(),
                attrs: element.attrs.clone(),
                children: shape_render(&element.children),
            }),
            RenderNode::Markup(markup) => out.push(Shape::Markup(markup.clone())),
        }
    }
    out
}

fn text_strategy() -> impl Strategy<Value = ContentNode> {
    "[a-zA-Z ,.]{1,8}".prop_map(ContentNode::text)
}

/// Variables always bind the same value to the same name.
fn var_strategy() -> impl Strategy<Value = ContentNode> {
    "[a-z]{1,4}".prop_map(|name| {
        let value = name.to_uppercase();
        ContentNode::var(name, value)
    })
}

fn attr_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z]{1,6}")
}

fn with_optional_class(element: Element, class: Option<String>) -> Element {
    match class {
        Some(class) => element.with_attr("class", class),
        None => element,
    }
}

fn tree_strategy() -> impl Strategy<Value = Vec<ContentNode>> {
    let empty_element = (
        prop::sample::select(vec!["br", "strong", "em", "Link", "span"]),
        attr_strategy(),
    )
        .prop_map(|(tag, class)| ContentNode::from(with_optional_class(Element::new(tag), class)));

    let leaf = prop_oneof![text_strategy(), var_strategy(), empty_element];

    let node = leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(vec!["strong", "em", "Link", "span"]),
            attr_strategy(),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(tag, class, children)| {
                ContentNode::from(with_optional_class(
                    Element::new(tag).with_children(children),
                    class,
                ))
            })
    });

    prop::collection::vec(node, 0..6)
}

fn alert_children() -> Vec<ContentNode> {
    vec![
        ContentNode::text("Hello "),
        Element::new("strong")
            .with_child(ContentNode::var("name", "Henry"))
            .into(),
        ContentNode::text(", you have "),
        ContentNode::var("count", 21),
        Element::new("Link")
            .with_attr("to", "/msgs")
            .with_child("Go.")
            .into(),
    ]
}

// ==================== 1. Identity round trip ====================

proptest! {
    #[test]
    fn render_of_canonical_template_rebuilds_tree(children in tree_strategy()) {
        let keep = KeepSet::default();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let canonical = canonicalize(&children, &keep, &mut diagnostics);
        let nodes = render(&children, &canonical.template, &canonical.table, &keep, &mut diagnostics);

        prop_assert_eq!(shape_render(&nodes), shape_content(&children),
            "template was {:?}", canonical.template);
        prop_assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    }
}

// ==================== 2. Canonicalization is deterministic ====================

proptest! {
    #[test]
    fn canonicalize_is_deterministic(children in tree_strategy()) {
        let keep = KeepSet::default();
        let mut first: Vec<Diagnostic> = Vec::new();
        let mut second: Vec<Diagnostic> = Vec::new();

        let a = canonicalize(&children, &keep, &mut first);
        let b = canonicalize(&children, &keep, &mut second);

        prop_assert_eq!(a, b);
        prop_assert!(first.is_empty());
        prop_assert!(second.is_empty());
    }
}

// ==================== 3. Empty template ====================

proptest! {
    #[test]
    fn empty_template_renders_nothing(children in tree_strategy()) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let nodes = render(&children, "", &InterpolationTable::new(), &KeepSet::default(), &mut diagnostics);

        prop_assert!(nodes.is_empty());
        prop_assert!(diagnostics.is_empty());
    }
}

// ==================== 4. Parser never panics ====================

proptest! {
    #[test]
    fn parse_never_panics(input in ".{0,64}") {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let _ = parse_markup(&input, &mut diagnostics);
    }

    #[test]
    fn parse_never_panics_on_tag_soup(input in "[<>/a-z0-9 =\"']{0,48}") {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let _ = parse_markup(&input, &mut diagnostics);
        for diagnostic in &diagnostics {
            prop_assert!(diagnostic.is_markup_error());
        }
    }
}

// ==================== 5. Render never panics ====================

proptest! {
    #[test]
    fn render_never_panics(template in "[<>/a-zA-Z0-9 {}]{0,48}") {
        let children = alert_children();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let _ = render(&children, &template, &InterpolationTable::new(), &KeepSet::default(), &mut diagnostics);
    }

    #[test]
    fn render_without_children_never_panics(template in ".{0,48}") {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let _ = render(&[], &template, &InterpolationTable::new(), &KeepSet::default(), &mut diagnostics);
    }
}

// ==================== 6. Validator self-consistency ====================

proptest! {
    #[test]
    fn canonical_template_validates_against_itself(children in tree_strategy()) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let canonical = canonicalize(&children, &KeepSet::default(), &mut diagnostics);

        let report = TemplateValidator::validate(&canonical.template, &canonical.template);
        prop_assert!(report.is_clean(), "template {:?} gave {:?}", canonical.template, report);
    }
}
