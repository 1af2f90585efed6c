//! Flat key/value metadata tags
//!
//! Image metadata (XMP Dublin Core tags such as `Xmp.dc.creator`) is kept
//! outside the statement model, as an ordered list of strings per tag key.
//! [`TagStore`] is the seam to whatever metadata backend the caller uses;
//! [`MemoryTagStore`] is a plain in-memory implementation.

use crate::rdf::namespace::{cc, dc, dcterms, rdf, xhv};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Multi-valued tag storage keyed by tag name
pub trait TagStore {
    /// All values of a tag, in order; empty when the tag is unset
    fn get_tag_multiple(&self, name: &str) -> Vec<String>;

    /// Replace a tag's values
    fn set_tag_multiple(&mut self, name: &str, values: Vec<String>);

    /// Remove a tag entirely
    fn clear_tag(&mut self, name: &str);

    /// Replace a tag with a single value
    fn set_tag_string(&mut self, name: &str, value: &str) {
        self.set_tag_multiple(name, vec![value.to_string()]);
    }

    /// A tag rendered as one string (values joined with `", "`)
    fn get_tag_string(&self, name: &str) -> Option<String> {
        let values = self.get_tag_multiple(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Append a value unless the tag already holds it.
    ///
    /// Returns whether the value was added.
    fn append_tag_value(&mut self, name: &str, value: &str) -> bool {
        let mut values = self.get_tag_multiple(name);
        if values.iter().any(|existing| existing == value) {
            return false;
        }
        values.push(value.to_string());
        self.set_tag_multiple(name, values);
        true
    }
}

/// In-memory tag store, keys kept in first-set order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryTagStore {
    tags: IndexMap<String, Vec<String>>,
}

impl MemoryTagStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over tags and their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of tags set
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check whether no tag is set
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagStore for MemoryTagStore {
    fn get_tag_multiple(&self, name: &str) -> Vec<String> {
        self.tags.get(name).cloned().unwrap_or_default()
    }

    fn set_tag_multiple(&mut self, name: &str, values: Vec<String>) {
        self.tags.insert(name.to_string(), values);
    }

    fn clear_tag(&mut self, name: &str) {
        self.tags.shift_remove(name);
    }
}

pub const TAG_SOURCE: &str = "Xmp.dc.source";
pub const TAG_CREATOR: &str = "Xmp.dc.creator";

/// Which predicates feed a metadata tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMapping {
    /// Tag key, e.g. `Xmp.dc.title`
    pub tag: &'static str,
    /// Predicate IRIs read for this tag, in lookup order
    pub predicates: &'static [&'static str],
    /// Ordered tags collect every value; the others keep the last one
    pub ordered: bool,
}

const fn mapping(
    tag: &'static str,
    predicates: &'static [&'static str],
    ordered: bool,
) -> TagMapping {
    TagMapping {
        tag,
        predicates,
        ordered,
    }
}

/// Dublin Core tag mapping used when copying a source's metadata
pub const TAG_MAPPINGS: &[TagMapping] = &[
    mapping("Xmp.dc.contributor", &[dc::CONTRIBUTOR, dcterms::CONTRIBUTOR], false),
    mapping("Xmp.dc.coverage", &[dc::COVERAGE, dcterms::COVERAGE], false),
    mapping(TAG_CREATOR, &[dc::CREATOR, dcterms::CREATOR], true),
    mapping("Xmp.dc.date", &[dc::DATE, dcterms::DATE], false),
    mapping("Xmp.dc.description", &[dc::DESCRIPTION, dcterms::DESCRIPTION], false),
    mapping("Xmp.dc.format", &[dc::FORMAT, dcterms::FORMAT], false),
    mapping("Xmp.dc.identifier", &[dc::IDENTIFIER, dcterms::IDENTIFIER], false),
    mapping("Xmp.dc.language", &[dc::LANGUAGE, dcterms::LANGUAGE], false),
    mapping("Xmp.dc.publisher", &[dc::PUBLISHER, dcterms::PUBLISHER], false),
    mapping("Xmp.dc.relation", &[dc::RELATION, dcterms::RELATION], false),
    mapping("Xmp.dc.rights", &[xhv::LICENSE, dcterms::LICENSE, cc::LICENSE], false),
    mapping(TAG_SOURCE, &[dc::SOURCE, dcterms::SOURCE], true),
    mapping("Xmp.dc.subject", &[dc::SUBJECT, dcterms::SUBJECT], false),
    mapping("Xmp.dc.title", &[dc::TITLE, dcterms::TITLE], false),
    mapping("Xmp.dc.type", &[dc::TYPE, dcterms::TYPE, rdf::TYPE], false),
];
