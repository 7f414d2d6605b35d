//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types that the
//! metadata extractor and content scorer read from. Both are read-only views:
//! nothing in this crate mutates a parsed document.
//!
//! # Example
//!
//! ```rust
//! use gleaner_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body><p class="content">Paragraph</p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse_with_location(html, "https://example.com/post").unwrap();
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! assert_eq!(doc.location(), Some("https://example.com/post"));
//! assert_eq!(doc.select("p.content").unwrap().len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{GleanerError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page together with the location it was loaded
/// from, if the caller knows it. The location is stored verbatim and may be
/// malformed; consumers parse it on demand.
pub struct Document {
    html: Html,
    location: Option<String>,
}

impl Document {
    /// Parses HTML from a string with no known location.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gleaner_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>").unwrap();
    /// assert!(doc.location().is_none());
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, location: None })
    }

    /// Parses HTML from a string and records the page location.
    ///
    /// An empty location is treated as absent.
    pub fn parse_with_location(html: &str, location: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        let location = Some(location.trim().to_string()).filter(|l| !l.is_empty());
        Ok(Self { html, location })
    }

    /// Gets the location the document was loaded from, if known.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`GleanerError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gleaner_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    ///
    /// Invalid selectors are logged and treated as "no match".
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        match parse_selector(selector) {
            Ok(sel) => self.html.select(&sel).next().map(|el| Element { element: el }),
            Err(e) => {
                tracing::debug!(selector, error = %e, "selector rejected");
                None
            }
        }
    }

    /// Gets the trimmed text of the `<title>` element, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .map(|el| el.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// A non-owning handle to one element of a [`Document`].
///
/// # Example
///
/// ```rust
/// use gleaner_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name (e.g. "div", "td").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the raw class attribute, or an empty string.
    pub fn class_name(&self) -> &'a str {
        self.attr("class").unwrap_or("")
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`GleanerError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Counts descendant elements (excluding this one) with the given tag name.
    pub fn count_descendants(&self, tag: &str) -> usize {
        self.descendant_elements().filter(|el| el.value().name() == tag).count()
    }

    /// Returns descendant elements (excluding this one) with the given tag name,
    /// in document order.
    pub fn descendants_by_tag(&self, tag: &str) -> Vec<Element<'a>> {
        self.descendant_elements()
            .filter(|el| el.value().name() == tag)
            .map(|el| Element { element: el })
            .collect()
    }

    /// Finds the nearest element, starting with this one, with the given tag name.
    pub fn closest(&self, tag: &str) -> Option<Element<'a>> {
        std::iter::once(self.element)
            .chain(self.element.ancestors().filter_map(ElementRef::wrap))
            .find(|el| el.value().name() == tag)
            .map(|el| Element { element: el })
    }

    /// Checks whether two handles refer to the same node.
    pub fn is_same(&self, other: &Element<'_>) -> bool {
        self.element.id() == other.element.id()
    }

    fn descendant_elements(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.element.descendants().skip(1).filter_map(ElementRef::wrap)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| GleanerError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Decodes HTML character references in `text`.
///
/// The text is parsed as the contents of a detached `<textarea>`, which is
/// parsed as RCDATA: references are decoded and markup is kept verbatim.
/// Every `<` is escaped first so nothing in `text` can close the scratch
/// element early. The scratch tree is dropped before returning.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let escaped = text.replace('<', "&lt;");
    let scratch = Html::parse_fragment(&format!("<textarea>{}</textarea>", escaped));
    match parse_selector("textarea") {
        Ok(sel) => scratch
            .select(&sel)
            .next()
            .map(|el| el.text().collect())
            .unwrap_or_else(|| text.to_string()),
        Err(_) => text.to_string(),
    }
}
