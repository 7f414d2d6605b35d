//! Content-root scoring.
//!
//! Ranks candidate elements by how likely they are to hold the article body.
//! The score is a sum of independent signals (text volume, paragraph count,
//! link and image density, layout position, date and byline mentions, class
//! hints, footnotes, nested tables and legacy table layouts). It has no fixed
//! range; only the relative order of scores matters.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DEFAULT_CANDIDATES, FOOTNOTE_INLINE_REFERENCES};
use crate::parse::{Document, Element};

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b")
        .expect("valid date regex")
});

static BYLINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:by|written by|author:)\s+[A-Za-z\s]+\b").expect("valid byline regex"));

/// Weights and thresholds for content scoring.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// A best candidate must score strictly above this to be selected
    pub min_score: f64,
    /// Points per word of text content
    pub word_weight: f64,
    /// Points per descendant `<p>`
    pub paragraph_bonus: f64,
    /// Multiplier for the links-per-word ratio
    pub link_density_penalty: f64,
    /// Multiplier for the images-per-word ratio
    pub image_density_penalty: f64,
    /// Bonus for elements laid out right of the viewport midpoint
    pub right_side_bonus: f64,
    /// Bonus for text mentioning a "Month D, YYYY" date
    pub date_bonus: f64,
    /// Bonus for text containing a byline
    pub byline_bonus: f64,
    /// Bonus for a class containing "content", "article" or "post"
    pub content_class_bonus: f64,
    /// Bonus for containing inline footnote references
    pub footnote_bonus: f64,
    /// Penalty per descendant `<table>`
    pub nested_table_penalty: f64,
    /// Tables wider than this (attribute or computed px) count as layout tables
    pub layout_table_min_width: f64,
    /// Bonus for an inner cell of a layout table
    pub layout_cell_bonus: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            min_score: 50.0,
            word_weight: 1.0,
            paragraph_bonus: 10.0,
            link_density_penalty: 5.0,
            image_density_penalty: 3.0,
            right_side_bonus: 5.0,
            date_bonus: 10.0,
            byline_bonus: 10.0,
            content_class_bonus: 15.0,
            footnote_bonus: 10.0,
            nested_table_penalty: 5.0,
            layout_table_min_width: 400.0,
            layout_cell_bonus: 10.0,
        }
    }
}

impl ScoreConfig {
    /// Creates a new builder for ScoreConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gleaner_core::ScoreConfig;
    ///
    /// let config = ScoreConfig::builder().min_score(20.0).layout_table_min_width(600.0).build();
    /// assert_eq!(config.min_score, 20.0);
    /// ```
    pub fn builder() -> ScoreConfigBuilder {
        ScoreConfigBuilder::new()
    }
}

/// Builder for ScoreConfig.
pub struct ScoreConfigBuilder {
    config: ScoreConfig,
}

impl ScoreConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ScoreConfig::default() }
    }

    /// Sets the selection threshold.
    pub fn min_score(mut self, value: f64) -> Self {
        self.config.min_score = value;
        self
    }

    /// Sets the points awarded per word.
    pub fn word_weight(mut self, value: f64) -> Self {
        self.config.word_weight = value;
        self
    }

    /// Sets the per-paragraph bonus.
    pub fn paragraph_bonus(mut self, value: f64) -> Self {
        self.config.paragraph_bonus = value;
        self
    }

    /// Sets the link density multiplier.
    pub fn link_density_penalty(mut self, value: f64) -> Self {
        self.config.link_density_penalty = value;
        self
    }

    /// Sets the image density multiplier.
    pub fn image_density_penalty(mut self, value: f64) -> Self {
        self.config.image_density_penalty = value;
        self
    }

    pub fn right_side_bonus(mut self, value: f64) -> Self {
        self.config.right_side_bonus = value;
        self
    }

    pub fn date_bonus(mut self, value: f64) -> Self {
        self.config.date_bonus = value;
        self
    }

    pub fn byline_bonus(mut self, value: f64) -> Self {
        self.config.byline_bonus = value;
        self
    }

    pub fn footnote_bonus(mut self, value: f64) -> Self {
        self.config.footnote_bonus = value;
        self
    }

    /// Sets the content class bonus.
    pub fn content_class_bonus(mut self, value: f64) -> Self {
        self.config.content_class_bonus = value;
        self
    }

    /// Sets the per-table penalty.
    pub fn nested_table_penalty(mut self, value: f64) -> Self {
        self.config.nested_table_penalty = value;
        self
    }

    /// Sets the minimum width of a layout table.
    pub fn layout_table_min_width(mut self, value: f64) -> Self {
        self.config.layout_table_min_width = value;
        self
    }

    /// Sets the layout table cell bonus.
    pub fn layout_cell_bonus(mut self, value: f64) -> Self {
        self.config.layout_cell_bonus = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ScoreConfig {
        self.config
    }
}

impl Default for ScoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout information for scored elements.
///
/// Parsed trees have no layout engine; implementors backed by a renderer
/// can supply real geometry. `None` means the signal is absent and is
/// skipped.
pub trait Geometry {
    /// Width of the viewport in CSS pixels.
    fn viewport_width(&self) -> Option<f64>;

    /// Left edge of the element's bounding box in CSS pixels.
    fn bounding_left(&self, element: &Element<'_>) -> Option<f64>;

    /// Computed CSS `width` of the element, e.g. `"640px"`.
    fn computed_width(&self, element: &Element<'_>) -> Option<String>;
}

/// Geometry for non-rendering contexts.
///
/// Reports no position or viewport. Widths come from the inline `style`
/// attribute, the only style information a parsed tree carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl Geometry for NoGeometry {
    fn viewport_width(&self) -> Option<f64> {
        None
    }

    fn bounding_left(&self, _element: &Element<'_>) -> Option<f64> {
        None
    }

    fn computed_width(&self, element: &Element<'_>) -> Option<String> {
        inline_style_property(element, "width")
    }
}

/// A scored candidate.
#[derive(Debug, Clone)]
pub struct ContentScore<'a> {
    pub score: f64,
    pub element: Element<'a>,
}

/// Scores an element without layout information.
pub fn score_element(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    score_element_with_geometry(element, config, &NoGeometry)
}

/// Scores an element, using `geometry` for the position and width signals.
pub fn score_element_with_geometry(element: &Element<'_>, config: &ScoreConfig, geometry: &dyn Geometry) -> f64 {
    let text = element.text();
    let words = text.split_whitespace().count();
    let per_word = words.max(1) as f64;

    let mut score = words as f64 * config.word_weight;

    score += element.count_descendants("p") as f64 * config.paragraph_bonus;
    score -= element.count_descendants("a") as f64 / per_word * config.link_density_penalty;
    score -= element.count_descendants("img") as f64 / per_word * config.image_density_penalty;

    match (geometry.bounding_left(element), geometry.viewport_width()) {
        (Some(left), Some(viewport)) if left > viewport / 2.0 => score += config.right_side_bonus,
        (Some(_), Some(_)) => {}
        _ => tracing::trace!("layout unavailable, skipping position signal"),
    }

    if DATE_PATTERN.is_match(&text) {
        score += config.date_bonus;
    }

    if BYLINE_PATTERN.is_match(&text) {
        score += config.byline_bonus;
    }

    if has_content_class(element.class_name()) {
        score += config.content_class_bonus;
    }

    match element.select(FOOTNOTE_INLINE_REFERENCES) {
        Ok(footnotes) if !footnotes.is_empty() => score += config.footnote_bonus,
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "footnote selector rejected"),
    }

    score -= element.count_descendants("table") as f64 * config.nested_table_penalty;

    if is_inner_layout_cell(element, config, geometry) {
        score += config.layout_cell_bonus;
    }

    score
}

/// Picks the highest-scoring candidate, if it scores above `config.min_score`.
///
/// Ties go to the earliest candidate.
pub fn find_best_element<'a>(candidates: &[Element<'a>], config: &ScoreConfig) -> Option<ContentScore<'a>> {
    find_best_element_with_geometry(candidates, config, &NoGeometry)
}

/// [`find_best_element`] with layout information.
pub fn find_best_element_with_geometry<'a>(
    candidates: &[Element<'a>], config: &ScoreConfig, geometry: &dyn Geometry,
) -> Option<ContentScore<'a>> {
    let mut best: Option<ContentScore<'a>> = None;

    for element in candidates {
        let score = score_element_with_geometry(element, config, geometry);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(ContentScore { score, element: *element });
        }
    }

    best.filter(|b| b.score > config.min_score)
}

/// Default candidate list for documents where the caller has none.
pub fn candidate_elements(doc: &Document) -> Vec<Element<'_>> {
    doc.select(DEFAULT_CANDIDATES).unwrap_or_default()
}

fn has_content_class(class: &str) -> bool {
    let class = class.to_lowercase();
    class.contains("content") || class.contains("article") || class.contains("post")
}

/// A `td` that is neither the first nor the last cell of a table that looks
/// like an old-style page layout.
fn is_inner_layout_cell(element: &Element<'_>, config: &ScoreConfig, geometry: &dyn Geometry) -> bool {
    if !matches!(element.tag_name().as_str(), "td" | "th") {
        return false;
    }

    let Some(table) = element.closest("table") else {
        return false;
    };

    if !is_layout_table(&table, config, geometry) {
        return false;
    }

    let cells = table.descendants_by_tag("td");
    match cells.iter().position(|cell| cell.is_same(element)) {
        Some(index) => index > 0 && index < cells.len() - 1,
        None => false,
    }
}

fn is_layout_table(table: &Element<'_>, config: &ScoreConfig, geometry: &dyn Geometry) -> bool {
    let min_width = config.layout_table_min_width;

    let attr_width = table.attr("width").and_then(leading_number).unwrap_or(0.0);
    let computed_width = geometry
        .computed_width(table)
        .filter(|width| width.contains("px"))
        .and_then(|width| leading_number(&width));

    attr_width > min_width
        || computed_width.is_some_and(|width| width > min_width)
        || table.attr("align").is_some_and(|align| align.eq_ignore_ascii_case("center"))
        || {
            let class = table.class_name().to_lowercase();
            class.contains("content") || class.contains("article")
        }
}

/// Parses the leading integer of `value`, ignoring leading whitespace and
/// anything after the digits (`"600px"` -> 600).
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<f64>().ok().map(|n| sign * n)
}

/// The last declaration of `property` in the element's inline `style`.
fn inline_style_property(element: &Element<'_>, property: &str) -> Option<String> {
    element
        .attr("style")?
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| value.trim().to_string())
        .next_back()
}
