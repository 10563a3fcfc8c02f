//! Minimal markup parser for translated templates.
//!
//! Turns a flat string of text, `<tag attr="v">...</tag>` and `<tag/>` into a
//! small attributed tree. It is deliberately forgiving: translators edit
//! these strings by hand, so anything that does not look like a tag is text,
//! stray closing tags are dropped, and tags left open are closed at the end
//! of their parent. No entity decoding is done.
//!
//! Tag names use the ASCII class `[A-Za-z0-9:_.-]`, so positional tags such as
//! `<0>` and component names such as `<Link>` both parse.

use crate::trans::diagnostics::{Diagnostic, Reporter};
use crate::trans::node::Attributes;

/// A parsed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Text(String),
    Tag(MarkupTag),
}

/// A parsed tag with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkupTag {
    pub name: String,
    pub attrs: Attributes,
    pub children: Vec<MarkupNode>,
    /// Self-closing (`<x/>`) or an HTML void element; never has children.
    pub void_element: bool,
}

impl MarkupNode {
    /// Text content of a text node.
    pub fn content(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(text) => Some(text),
            MarkupNode::Tag(_) => None,
        }
    }
}

impl MarkupTag {
    /// The text of the only child, when the tag holds exactly one non-empty text node.
    pub fn text_child(&self) -> Option<&str> {
        match self.children.as_slice() {
            [MarkupNode::Text(text)] if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Text of the first child, if that child is text.
    pub fn first_text(&self) -> Option<&str> {
        self.children.first().and_then(MarkupNode::content)
    }
}

pub(crate) fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

fn is_attr_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
}

/// HTML void names; the parser never gives these children.
pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[derive(Debug)]
enum Token {
    Start {
        name: String,
        attrs: Attributes,
        self_closing: bool,
    },
    End(String),
}

/// Parse `input` into a forest of markup nodes. Never fails.
pub fn parse(input: &str, reporter: &mut dyn Reporter) -> Vec<MarkupNode> {
    let mut tree = TreeBuilder::default();
    let bytes = input.as_bytes();
    let mut text_start = 0;
    let mut i = 0;

    // Invariant: slices are only cut at ASCII '<' or at the end of a token,
    // which is always just past an ASCII byte, so they stay on char boundaries.
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let Some((token, end)) = scan_tag(input, i) else {
            i += 1;
            continue;
        };

        tree.text(&input[text_start..i]);
        match token {
            Token::Start {
                name,
                attrs,
                self_closing,
            } => {
                let void_element = self_closing || is_void_element(&name);
                tree.open(MarkupTag {
                    name,
                    attrs,
                    children: Vec::new(),
                    void_element,
                });
            }
            Token::End(name) => tree.close(&name, reporter),
        }
        i = end;
        text_start = end;
    }
    tree.text(&input[text_start..]);
    tree.finish(reporter)
}

/// Scan one tag starting at `start` (which holds `<`). Returns the token and
/// the byte offset just past its `>`, or `None` if this is not a tag.
fn scan_tag(input: &str, start: usize) -> Option<(Token, usize)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut j = start + 1;

    if bytes.get(j) == Some(&b'/') {
        j += 1;
        let name_start = j;
        while j < len && is_tag_name_byte(bytes[j]) {
            j += 1;
        }
        if j == name_start {
            return None;
        }
        let name = input[name_start..j].to_string();
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        return (bytes.get(j) == Some(&b'>')).then(|| (Token::End(name), j + 1));
    }

    let name_start = j;
    while j < len && is_tag_name_byte(bytes[j]) {
        j += 1;
    }
    if j == name_start {
        return None;
    }
    let name = input[name_start..j].to_string();
    let mut attrs = Attributes::new();

    loop {
        let before_ws = j;
        while j < len && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        match *bytes.get(j)? {
            b'>' => {
                return Some((
                    Token::Start {
                        name,
                        attrs,
                        self_closing: false,
                    },
                    j + 1,
                ));
            }
            b'/' => {
                return (bytes.get(j + 1) == Some(&b'>')).then(|| {
                    (
                        Token::Start {
                            name,
                            attrs,
                            self_closing: true,
                        },
                        j + 2,
                    )
                });
            }
            _ => {}
        }

        // Attributes must be separated from the name and from each other.
        if j == before_ws {
            return None;
        }
        let attr_start = j;
        while j < len && is_attr_name_byte(bytes[j]) {
            j += 1;
        }
        if j == attr_start {
            return None;
        }
        let attr_name = input[attr_start..j].to_string();

        let mut k = j;
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if bytes.get(k) != Some(&b'=') {
            attrs.insert(attr_name, String::new());
            continue;
        }
        k += 1;
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let value = match *bytes.get(k)? {
            quote @ (b'"' | b'\'') => {
                let value_start = k + 1;
                let rel = input[value_start..].bytes().position(|b| b == quote)?;
                k = value_start + rel + 1;
                &input[value_start..value_start + rel]
            }
            _ => {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    k += 1;
                }
                &input[value_start..k]
            }
        };
        attrs.insert(attr_name, value.to_string());
        j = k;
    }
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<MarkupNode>,
    open: Vec<MarkupTag>,
}

impl TreeBuilder {
    fn append(&mut self, node: MarkupNode) {
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        if let (MarkupNode::Text(text), Some(MarkupNode::Text(last))) = (&node, siblings.last_mut())
        {
            last.push_str(text);
            return;
        }
        siblings.push(node);
    }

    fn text(&mut self, text: &str) {
        if !text.is_empty() {
            self.append(MarkupNode::Text(text.to_string()));
        }
    }

    fn open(&mut self, tag: MarkupTag) {
        if tag.void_element {
            self.append(MarkupNode::Tag(tag));
        } else {
            self.open.push(tag);
        }
    }

    fn close(&mut self, name: &str, reporter: &mut dyn Reporter) {
        let Some(target) = self.open.iter().rposition(|tag| tag.name == name) else {
            reporter.report(Diagnostic::StrayClosingTag {
                name: name.to_string(),
            });
            return;
        };
        while self.open.len() > target + 1 {
            self.pop_unclosed(reporter);
        }
        if let Some(tag) = self.open.pop() {
            self.append(MarkupNode::Tag(tag));
        }
    }

    fn pop_unclosed(&mut self, reporter: &mut dyn Reporter) {
        if let Some(tag) = self.open.pop() {
            reporter.report(Diagnostic::UnclosedTag {
                name: tag.name.clone(),
            });
            self.append(MarkupNode::Tag(tag));
        }
    }

    fn finish(mut self, reporter: &mut dyn Reporter) -> Vec<MarkupNode> {
        while !self.open.is_empty() {
            self.pop_unclosed(reporter);
        }
        self.roots
    }
}
