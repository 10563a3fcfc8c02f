//! Tags that round-trip literally instead of by sibling index.

use crate::trans::markup::is_tag_name_byte;
use std::collections::BTreeSet;

/// The set of tag names eligible for literal (non-indexed) round-tripping.
///
/// A kept tag is written as `<br/>` or `<strong>text</strong>` in the
/// canonical template when it carries no attributes, and a kept tag found in
/// a translated template is always synthesized fresh during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepSet {
    tags: BTreeSet<String>,
}

impl KeepSet {
    /// Tags kept when nothing else is configured.
    pub const DEFAULT_TAGS: [&'static str; 2] = ["br", "strong"];

    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// A set that keeps nothing: every element is addressed by index.
    pub fn empty() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether `template` contains an opening, closing or self-closing tag
    /// whose name is in the set.
    ///
    /// Only real markup counts: the word "brown" in plain text does not
    /// match `br`, but `<br/>`, `<br />` and `</strong>` do.
    pub fn appears_in(&self, template: &str) -> bool {
        if self.tags.is_empty() {
            return false;
        }

        let bytes = template.as_bytes();
        template.match_indices('<').any(|(pos, _)| {
            let mut start = pos + 1;
            if bytes.get(start) == Some(&b'/') {
                start += 1;
            }
            let mut end = start;
            while end < bytes.len() && is_tag_name_byte(bytes[end]) {
                end += 1;
            }
            // Name bytes are ASCII, so both ends sit on char boundaries.
            end > start && self.contains(&template[start..end])
        })
    }
}

impl Default for KeepSet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TAGS)
    }
}
