//! Shared selector constants.

/// Inline footnote and citation reference markup used by common publishing
/// platforms (Wikipedia, arXiv/LaTeXML, WordPress footnote plugins, Substack,
/// DPUB-ARIA). Joined into a single selector list.
pub const FOOTNOTE_INLINE_REFERENCES: &str = concat!(
    "sup.reference,",
    "cite.ltx_cite,",
    "sup[id^=\"fnr\"],",
    "span[id^=\"fnr\"],",
    "span[class*=\"footnote_ref\"],",
    "span[class*=\"footnote-ref\"],",
    "span.footnote-link,",
    "a.citation,",
    "a.footnote-anchor,",
    "a[id^=\"fnref\"],",
    "a[id^=\"ref-link\"],",
    "a[href^=\"#fn\"],",
    "a[href^=\"#cite\"],",
    "a[href^=\"#reference\"],",
    "a[href^=\"#footnote\"],",
    "a[href*=\"cite_note\"],",
    "a[href*=\"cite_ref\"],",
    "a[role=\"doc-noteref\"],",
    "a[role=\"doc-biblioref\"]"
);

/// Elements considered by [`candidate_elements`](crate::scoring::candidate_elements)
/// when the caller has no candidate list of its own.
pub const DEFAULT_CANDIDATES: &str = "article, main, section, div, td, [role=\"main\"]";
