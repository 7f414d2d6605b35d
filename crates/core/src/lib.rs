//! Metadata extraction and content-root scoring for readability-style
//! pipelines.
//!
//! Two independent, read-only components:
//!
//! - [`extract`] resolves title, author, dates and friends from a document,
//!   its schema.org data and its meta-tag table.
//! - [`find_best_element`] scores candidate elements and picks the likely
//!   article body.
//!
//! ```rust
//! use gleaner_core::{Document, ScoreConfig, candidate_elements, find_best_element};
//!
//! let html = format!("<body><div class='post'><p>{}</p></div></body>", "word ".repeat(40));
//! let doc = Document::parse_with_location(&html, "https://example.com/post").unwrap();
//!
//! let metadata = doc.extract_metadata();
//! assert_eq!(metadata.domain, "example.com");
//!
//! let best = find_best_element(&candidate_elements(&doc), &ScoreConfig::default()).unwrap();
//! assert_eq!(best.element.tag_name(), "div");
//! ```

pub mod constants;
pub mod error;
pub mod meta;
pub mod metadata;
pub mod parse;
pub mod schema;
pub mod scoring;

pub use error::{GleanerError, Result};
pub use meta::{MetaAttr, MetaTagItem, collect_meta_tags, meta_content};
pub use metadata::{Metadata, clean_title, extract};
pub use parse::{Document, Element};
pub use schema::{MAX_SCHEMA_DEPTH, PropertyPath, Segment, collect_schema_org_data, resolve};
pub use scoring::{
    ContentScore, Geometry, NoGeometry, ScoreConfig, ScoreConfigBuilder, candidate_elements, find_best_element,
    find_best_element_with_geometry, score_element, score_element_with_geometry,
};
