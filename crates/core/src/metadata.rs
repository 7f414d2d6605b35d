//! Page metadata extraction.
//!
//! Every field is resolved through an ordered fallback chain over three
//! sources: the meta-tag table, schema.org structured data, and direct
//! document queries (microdata, `<link>`, `<time>`). The first source that
//! yields a non-blank value wins. No field failure aborts extraction; missing
//! values become empty strings.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::meta::{MetaAttr, MetaTagItem, collect_meta_tags, meta_content};
use crate::parse::{Document, decode_html_entities};
use crate::schema::{collect_schema_org_data, resolve};
use crate::{GleanerError, Result};

/// Represents all extracted metadata from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub domain: String,
    pub favicon: String,
    pub image: String,
    pub published: String,
    pub author: String,
    pub site: String,
    /// The structured data the metadata was extracted from, passed through.
    pub schema_org_data: Option<Value>,
    /// Filled in by the surrounding pipeline; always zero here.
    pub word_count: usize,
    /// Filled in by the surrounding pipeline; always zero here.
    pub parse_time: u64,
}

/// Extracts metadata from a document, its structured data and its meta-tag table.
///
/// The meta-tag table must be in document order.
///
/// # Example
///
/// ```rust
/// use gleaner_core::{Document, MetaTagItem, extract};
/// use serde_json::json;
///
/// let doc = Document::parse_with_location("<title>Post | Blog</title>", "https://www.blog.dev/post").unwrap();
/// let schema = json!({"publisher": {"name": "Blog"}});
/// let tags = vec![MetaTagItem::named("author", "Jane")];
///
/// let metadata = extract(&doc, Some(&schema), &tags);
/// assert_eq!(metadata.title, "Post");
/// assert_eq!(metadata.domain, "blog.dev");
/// assert_eq!(metadata.author, "Jane");
/// ```
pub fn extract(doc: &Document, schema_org_data: Option<&Value>, meta_tags: &[MetaTagItem]) -> Metadata {
    let sources = Sources { doc, schema: schema_org_data, tags: meta_tags };
    let (url, domain) = sources.url_and_domain();
    let site = sources.site();

    Metadata {
        title: clean_title(&sources.raw_title(), &site),
        description: sources.description(),
        domain,
        favicon: sources.favicon(url.as_deref()),
        image: sources.image(),
        published: sources.published(),
        author: sources.author(),
        site,
        schema_org_data: schema_org_data.cloned(),
        word_count: 0,
        parse_time: 0,
    }
}

impl Document {
    /// Extracts metadata using the document's own `<meta>` tags and JSON-LD blocks.
    pub fn extract_metadata(&self) -> Metadata {
        let tags = collect_meta_tags(self);
        let schema = collect_schema_org_data(self);
        extract(self, schema.as_ref(), &tags)
    }
}

struct Sources<'a> {
    doc: &'a Document,
    schema: Option<&'a Value>,
    tags: &'a [MetaTagItem],
}

impl Sources<'_> {
    fn name(&self, key: &str) -> Option<String> {
        meta_content(self.tags, MetaAttr::Name, key)
    }

    fn property(&self, key: &str) -> Option<String> {
        meta_content(self.tags, MetaAttr::Property, key)
    }

    fn schema(&self, path: &str) -> Option<String> {
        self.schema
            .and_then(|data| resolve(data, path))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// First non-blank attribute value of the first element matching `selector`.
    fn attr_of(&self, selector: &str, attr: &str) -> Option<String> {
        self.doc
            .select_first(selector)
            .and_then(|el| el.attr(attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Resolves the page URL and its `www.`-stripped hostname.
    ///
    /// When the resolved URL does not parse, `<base href>` is tried instead.
    fn url_and_domain(&self) -> (Option<String>, String) {
        let url = self
            .doc
            .location()
            .map(str::to_string)
            .or_else(|| self.property("og:url"))
            .or_else(|| self.property("twitter:url"))
            .or_else(|| self.schema("url"))
            .or_else(|| self.schema("mainEntityOfPage.url"))
            .or_else(|| self.schema("mainEntity.url"))
            .or_else(|| self.schema("WebSite.url"))
            .or_else(|| self.attr_of("link[rel=\"canonical\"]", "href"));

        let Some(url) = url else {
            return (None, String::new());
        };

        match domain_of(&url) {
            Ok(domain) => (Some(url), domain),
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to parse page URL");
                match self.attr_of("base[href]", "href") {
                    Some(base) => match domain_of(&base) {
                        Ok(domain) => (Some(base), domain),
                        Err(e) => {
                            tracing::warn!(url = %base, error = %e, "failed to parse base URL");
                            (Some(url), String::new())
                        }
                    },
                    None => (Some(url), String::new()),
                }
            }
        }
    }

    fn raw_title(&self) -> String {
        self.property("og:title")
            .or_else(|| self.name("twitter:title"))
            .or_else(|| self.schema("headline"))
            .or_else(|| self.name("title"))
            .or_else(|| self.name("sailthru.title"))
            .or_else(|| self.doc.title())
            .unwrap_or_default()
    }

    fn description(&self) -> String {
        self.name("description")
            .or_else(|| self.property("description"))
            .or_else(|| self.property("og:description"))
            .or_else(|| self.schema("description"))
            .or_else(|| self.name("twitter:description"))
            .or_else(|| self.name("sailthru.description"))
            .unwrap_or_default()
    }

    fn image(&self) -> String {
        self.property("og:image")
            .or_else(|| self.name("twitter:image"))
            .or_else(|| self.schema("image.url"))
            .or_else(|| self.name("sailthru.image.full"))
            .unwrap_or_default()
    }

    fn favicon(&self, base_url: Option<&str>) -> String {
        self.property("og:image:favicon")
            .or_else(|| self.attr_of("link[rel='icon']", "href"))
            .or_else(|| self.attr_of("link[rel='shortcut icon']", "href"))
            .or_else(|| {
                let base = base_url?;
                resolve_against(base, "/favicon.ico")
                    .map_err(|e| tracing::warn!(%base, error = %e, "failed to construct favicon URL"))
                    .ok()
            })
            .unwrap_or_default()
    }

    fn published(&self) -> String {
        self.schema("datePublished")
            .or_else(|| self.name("publishDate"))
            .or_else(|| self.property("article:published_time"))
            .or_else(|| self.attr_of("abbr[itemprop=\"datePublished\"]", "title"))
            .or_else(|| self.time_element())
            .or_else(|| self.name("sailthru.date"))
            .unwrap_or_default()
    }

    /// `datetime` of the first `<time>`, or its text, with entities decoded.
    fn time_element(&self) -> Option<String> {
        let time = self.doc.select_first("time")?;
        let raw = match time.attr("datetime") {
            Some(datetime) => datetime.trim().to_string(),
            None => time.text().trim().to_string(),
        };
        Some(decode_html_entities(&raw)).filter(|value| !value.trim().is_empty())
    }

    fn author(&self) -> String {
        self.name("sailthru.author")
            .or_else(|| self.property("author"))
            .or_else(|| self.name("author"))
            .or_else(|| self.name("byl"))
            .or_else(|| self.name("authorList"))
            .or_else(|| self.schema("author.name"))
            .or_else(|| self.schema("author.[].name"))
            .or_else(|| self.microdata_names("[itemprop=\"author\"]"))
            .or_else(|| self.microdata_names("[itemprop~=\"author\"][itemprop~=\"name\"]"))
            .or_else(|| {
                self.doc
                    .select_first(".author")
                    .map(|el| el.text().trim().to_string())
                    .filter(|text| !text.is_empty())
            })
            .or_else(|| self.name("copyright"))
            .or_else(|| self.schema("copyrightHolder.name"))
            .or_else(|| self.property("og:site_name"))
            .or_else(|| self.schema("publisher.name"))
            .or_else(|| self.schema("sourceOrganization.name"))
            .or_else(|| self.schema("isPartOf.name"))
            .or_else(|| self.name("twitter:creator"))
            .or_else(|| self.name("application-name"))
            .unwrap_or_default()
    }

    /// Joins the text of every element matching `selector`, each with a
    /// trailing comma removed. Repeated names are kept once.
    fn microdata_names(&self, selector: &str) -> Option<String> {
        let elements = self
            .doc
            .select(selector)
            .map_err(|e| tracing::debug!(selector, error = %e, "microdata query failed"))
            .ok()?;

        let mut names: Vec<String> = Vec::new();
        for el in &elements {
            let text = el.text();
            let name = text.trim().trim_end_matches(',').trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        Some(names.join(", ")).filter(|joined| !joined.is_empty())
    }

    fn site(&self) -> String {
        self.schema("publisher.name")
            .or_else(|| self.property("og:site_name"))
            .or_else(|| self.schema("WebSite.name"))
            .or_else(|| self.schema("sourceOrganization.name"))
            .or_else(|| self.name("copyright"))
            .or_else(|| self.schema("copyrightHolder.name"))
            .or_else(|| self.schema("isPartOf.name"))
            .or_else(|| self.name("application-name"))
            .unwrap_or_else(|| self.author())
    }
}

/// Hostname of `url` with a leading `www.` removed.
fn domain_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| GleanerError::InvalidUrl(format!("{}: {}", url, e)))?;
    let host = parsed.host_str().unwrap_or_default();
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn resolve_against(base: &str, path: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| GleanerError::InvalidUrl(format!("{}: {}", base, e)))?;
    let joined = base
        .join(path)
        .map_err(|e| GleanerError::InvalidUrl(format!("{}: {}", path, e)))?;
    Ok(joined.to_string())
}

/// Strips a leading or trailing site-name segment from `title`.
///
/// The site name must be separated by `|`, `-`, an en dash or an em dash and
/// is matched case-insensitively. The `Title | Site` form is tried before
/// `Site | Title`, and at most one segment is removed.
pub fn clean_title(title: &str, site_name: &str) -> String {
    if title.is_empty() || site_name.is_empty() {
        return title.to_string();
    }

    let site = regex::escape(site_name);
    let patterns = [
        format!(r"(?i)\s*[|\-–—]\s*{}\s*$", site),
        format!(r"(?i)^\s*{}\s*[|\-–—]\s*", site),
    ];

    for pattern in &patterns {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(title) => return re.replace(title, "").trim().to_string(),
            Ok(_) => {}
            Err(e) => tracing::debug!(site_name, error = %e, "site name pattern rejected"),
        }
    }

    title.trim().to_string()
}
