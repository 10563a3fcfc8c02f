//! Content tree model.
//!
//! A [`ContentNode`] tree is what callers hand to the canonicalizer and the
//! reconstructor. The tree is closed over four shapes: text, tagged elements,
//! single-variable interpolation bindings, and bare scalars (which are never
//! valid children but can arrive from loosely typed sources such as JSON).

use serde_json::Value;
use std::collections::BTreeMap;

/// Variable name -> bound value, accumulated while canonicalizing.
pub type InterpolationTable = BTreeMap<String, Value>;

/// Element attributes (props). Ordered so serialized output is stable.
pub type Attributes = BTreeMap<String, String>;

/// A renderable input node.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// Literal text, emitted verbatim.
    Text(String),

    /// A tagged element that owns its children.
    Element(Element),

    /// A variable binding such as `{name: "Henry"}`. Valid only with exactly one entry.
    Interpolation(InterpolationTable),

    /// A bare value where an interpolation binding was expected (e.g. `21` instead of `{count: 21}`).
    Scalar(Value),
}

/// A tagged element with attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<ContentNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append one child.
    pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children in order.
    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ContentNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The text of the only child, when the element has exactly one plain-text child.
    pub fn single_text_child(&self) -> Option<&str> {
        match self.children.as_slice() {
            [ContentNode::Text(text)] => Some(text),
            _ => None,
        }
    }
}

impl ContentNode {
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text(text.into())
    }

    /// A single-variable interpolation binding.
    pub fn var(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = InterpolationTable::new();
        entries.insert(name.into(), value.into());
        ContentNode::Interpolation(entries)
    }

    /// Children of an element; every other shape has none.
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Decode a node from loosely typed JSON.
    ///
    /// - strings become [`ContentNode::Text`]
    /// - objects with a string `tag` and no keys besides `tag`, `attrs` and
    ///   `children` become [`ContentNode::Element`]
    /// - any other object becomes [`ContentNode::Interpolation`]
    /// - numbers, booleans, null and arrays become [`ContentNode::Scalar`]
    pub fn from_json(value: Value) -> ContentNode {
        match value {
            Value::String(text) => ContentNode::Text(text),
            Value::Object(mut map) => {
                let is_element = matches!(map.get("tag"), Some(Value::String(_)))
                    && map
                        .keys()
                        .all(|key| matches!(key.as_str(), "tag" | "attrs" | "children"));

                if !is_element {
                    return ContentNode::Interpolation(map.into_iter().collect());
                }

                let tag = match map.remove("tag") {
                    Some(Value::String(tag)) => tag,
                    _ => String::new(),
                };
                let attrs = match map.remove("attrs") {
                    Some(Value::Object(attrs)) => attrs
                        .into_iter()
                        .map(|(name, value)| (name, value_to_text(&value)))
                        .collect(),
                    _ => Attributes::new(),
                };
                let children = map
                    .remove("children")
                    .map(sequence_from_json)
                    .unwrap_or_default();

                ContentNode::Element(Element {
                    tag,
                    attrs,
                    children,
                })
            }
            other => ContentNode::Scalar(other),
        }
    }
}

impl From<&str> for ContentNode {
    fn from(text: &str) -> Self {
        ContentNode::Text(text.to_string())
    }
}

impl From<String> for ContentNode {
    fn from(text: String) -> Self {
        ContentNode::Text(text)
    }
}

impl From<Element> for ContentNode {
    fn from(element: Element) -> Self {
        ContentNode::Element(element)
    }
}

/// Decode a child sequence from JSON. A lone non-array value becomes a
/// singleton sequence; `null` is an empty one.
pub fn sequence_from_json(value: Value) -> Vec<ContentNode> {
    match value {
        Value::Array(items) => items.into_iter().map(ContentNode::from_json).collect(),
        Value::Null => Vec::new(),
        other => vec![ContentNode::from_json(other)],
    }
}

/// Merge every interpolation binding found anywhere under `children` into `into`.
///
/// Later bindings overwrite earlier ones with the same name.
pub fn collect_interpolations(children: &[ContentNode], into: &mut InterpolationTable) {
    for child in children {
        if let ContentNode::Interpolation(entries) = child {
            into.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        collect_interpolations(child.children(), into);
    }
}

/// Text form of an interpolated value: strings unquoted, null empty, the rest as JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
