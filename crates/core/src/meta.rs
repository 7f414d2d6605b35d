//! Meta-tag table and lookup.
//!
//! The extractor reads page metadata from a flat table of `<meta>` records
//! rather than querying the document for every key. Callers may build the
//! table themselves or use [`collect_meta_tags`].

use serde::{Deserialize, Serialize};

use crate::parse::Document;

/// One `<meta>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTagItem {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: String,
}

impl MetaTagItem {
    /// Creates a `<meta name=".." content="..">` record.
    pub fn named(name: &str, content: &str) -> Self {
        Self { name: Some(name.to_string()), property: None, content: content.to_string() }
    }

    /// Creates a `<meta property=".." content="..">` record.
    pub fn with_property(property: &str, content: &str) -> Self {
        Self { name: None, property: Some(property.to_string()), content: content.to_string() }
    }

    fn key(&self, attr: MetaAttr) -> Option<&str> {
        match attr {
            MetaAttr::Name => self.name.as_deref(),
            MetaAttr::Property => self.property.as_deref(),
        }
    }
}

/// Which attribute of a meta tag a lookup matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    Name,
    Property,
}

/// Looks up the trimmed content of the first tag whose `attr` equals `key`
/// (case-insensitive).
///
/// Returns `None` when no tag matches or the matching tag's content is blank.
/// Only the first match is considered, so the table must be in document order.
pub fn meta_content(tags: &[MetaTagItem], attr: MetaAttr, key: &str) -> Option<String> {
    tags.iter()
        .find(|tag| tag.key(attr).is_some_and(|k| k.eq_ignore_ascii_case(key)))
        .map(|tag| tag.content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Builds the meta-tag table from every `<meta content>` in document order.
pub fn collect_meta_tags(doc: &Document) -> Vec<MetaTagItem> {
    let Ok(elements) = doc.select("meta[content]") else {
        return Vec::new();
    };

    elements
        .iter()
        .filter(|el| el.attr("name").is_some() || el.attr("property").is_some())
        .map(|el| MetaTagItem {
            name: el.attr("name").map(str::to_string),
            property: el.attr("property").map(str::to_string),
            content: el.attr("content").unwrap_or_default().to_string(),
        })
        .collect()
}
