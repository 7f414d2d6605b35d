//! Dotted-path resolution over schema.org / JSON-LD data.
//!
//! Structured data mixes objects, arrays and scalars with no fixed shape, so
//! lookups are expressed as dotted paths (`author.name`, `image.[0].url`)
//! and resolved in two phases:
//!
//! 1. an exact walk where every key must be found where the path says it is;
//! 2. if that finds nothing, an unordered deep search that lets each key be
//!    found at any depth below the current node.
//!
//! Arrays are flattened implicitly: a path applied to an array is applied to
//! every element. An object reached with the path exhausted resolves to its
//! `name` field.
//!
//! ```rust
//! use gleaner_core::schema::resolve;
//! use serde_json::json;
//!
//! let data = json!({"author": [{"name": "A"}, {"name": "B"}]});
//! assert_eq!(resolve(&data, "author.name"), Some("A, B".to_string()));
//! ```

use std::borrow::Cow;

use serde_json::Value;

use crate::parse::Document;
use crate::Result;

/// Recursion ceiling for a single resolution. Branches deeper than this are
/// abandoned; results found elsewhere are still returned.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// One segment of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A plain object key.
    Key(String),
    /// `[N]`: element N of an array.
    Index(usize),
    /// `[]`: every element of an array.
    Flatten,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "[]" {
            return Segment::Flatten;
        }

        raw.strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Segment::Index)
            .unwrap_or_else(|| Segment::Key(raw.to_string()))
    }

    /// The segment as an object key. Index markers are only special on arrays.
    fn as_key(&self) -> Cow<'_, str> {
        match self {
            Segment::Key(key) => Cow::Borrowed(key),
            Segment::Index(i) => Cow::Owned(format!("[{}]", i)),
            Segment::Flatten => Cow::Borrowed("[]"),
        }
    }
}

/// A parsed dotted property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<Segment>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Self {
        Self { segments: path.split('.').map(Segment::parse).collect() }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Resolves `path` against `data`, joining every non-empty match with `", "`.
///
/// Returns `None` when nothing matches.
pub fn resolve(data: &Value, path: &str) -> Option<String> {
    resolve_with_depth(data, path, MAX_SCHEMA_DEPTH)
}

/// [`resolve`] with an explicit recursion ceiling.
pub fn resolve_with_depth(data: &Value, path: &str, max_depth: usize) -> Option<String> {
    let path = PropertyPath::parse(path);
    let search = Search { max_depth };

    let mut results = search.run(data, path.segments(), true, 0);
    if results.is_empty() {
        results = search.run(data, path.segments(), false, 0);
    }

    let joined = results
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    Some(joined).filter(|s| !s.is_empty())
}

struct Search {
    max_depth: usize,
}

impl Search {
    fn run(&self, node: &Value, segments: &[Segment], exact: bool, depth: usize) -> Vec<String> {
        if depth > self.max_depth {
            tracing::debug!(depth, "schema search exceeded depth ceiling, abandoning branch");
            return Vec::new();
        }

        match node {
            Value::String(s) if segments.is_empty() => vec![s.clone()],
            Value::Array(items) => self.array(items, segments, exact, depth),
            Value::Object(map) => self.object(node, map, segments, exact, depth),
            _ => Vec::new(),
        }
    }

    fn array(&self, items: &[Value], segments: &[Segment], exact: bool, depth: usize) -> Vec<String> {
        match segments.split_first() {
            Some((Segment::Index(i), rest)) => items
                .get(*i)
                .map(|item| self.run(item, rest, exact, depth + 1))
                .unwrap_or_default(),
            Some((Segment::Flatten, rest)) => items
                .iter()
                .flat_map(|item| self.run(item, rest, exact, depth + 1))
                .collect(),
            None if items.iter().all(|item| item.is_string() || item.is_number()) => {
                items.iter().filter_map(scalar_to_string).collect()
            }
            _ => items
                .iter()
                .flat_map(|item| self.run(item, segments, exact, depth + 1))
                .collect(),
        }
    }

    fn object(
        &self, node: &Value, map: &serde_json::Map<String, Value>, segments: &[Segment], exact: bool, depth: usize,
    ) -> Vec<String> {
        let Some((segment, rest)) = segments.split_first() else {
            return map
                .get("name")
                .and_then(Value::as_str)
                .map(|name| vec![name.to_string()])
                .unwrap_or_default();
        };

        if *segment == Segment::Flatten {
            return self.run(node, rest, exact, depth + 1);
        }

        if let Some(value) = map.get(segment.as_key().as_ref()) {
            return self.run(value, rest, true, depth + 1);
        }

        if exact {
            return Vec::new();
        }

        map.values()
            .filter(|value| value.is_object() || value.is_array())
            .flat_map(|value| self.run(value, segments, false, depth + 1))
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collects every JSON-LD block in the document into one array.
///
/// Top-level `@graph` arrays are flattened into the result. Blocks that fail
/// to parse are skipped. Returns `None` when no block parsed.
pub fn collect_schema_org_data(doc: &Document) -> Option<Value> {
    let scripts = match doc.select("script[type=\"application/ld+json\"]") {
        Ok(scripts) => scripts,
        Err(e) => {
            tracing::debug!(error = %e, "could not query JSON-LD scripts");
            return None;
        }
    };

    let mut items = Vec::new();
    for script in &scripts {
        match parse_json_ld(&script.text()) {
            Ok(Value::Array(values)) => values.into_iter().for_each(|v| push_flattened(&mut items, v)),
            Ok(value) => push_flattened(&mut items, value),
            Err(e) => tracing::debug!(error = %e, "skipping unparsable JSON-LD block"),
        }
    }

    Some(Value::Array(items)).filter(|v| v.as_array().is_some_and(|a| !a.is_empty()))
}

fn parse_json_ld(raw: &str) -> Result<Value> {
    let content = raw
        .trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>")
        .trim();
    Ok(serde_json::from_str(content)?)
}

fn push_flattened(items: &mut Vec<Value>, value: Value) {
    match value {
        Value::Object(mut map) if map.get("@graph").is_some_and(Value::is_array) => {
            if let Some(Value::Array(graph)) = map.remove("@graph") {
                items.extend(graph);
            }
            if map.keys().any(|k| k != "@context") {
                items.push(Value::Object(map));
            }
        }
        other => items.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_path_segments() {
        let path = PropertyPath::parse("image.[0].url");
        assert_eq!(
            path.segments(),
            &[Segment::Key("image".into()), Segment::Index(0), Segment::Key("url".into())]
        );
        assert_eq!(PropertyPath::parse("author.[].name").segments()[1], Segment::Flatten);
        assert_eq!(PropertyPath::parse("[x]").segments()[0], Segment::Key("[x]".into()));
    }

    #[test]
    fn test_exact_path() {
        let data = json!({"headline": "Title", "publisher": {"name": "Pub"}});
        assert_eq!(resolve(&data, "headline"), Some("Title".to_string()));
        assert_eq!(resolve(&data, "publisher.name"), Some("Pub".to_string()));
    }

    #[test]
    fn test_exact_match_beats_deep_match() {
        let data = json!({
            "mainEntity": {"publisher": {"name": "Nested"}},
            "publisher": {"name": "Direct"}
        });
        assert_eq!(resolve(&data, "publisher.name"), Some("Direct".to_string()));
    }

    #[test]
    fn test_array_flattening() {
        let data = json!({"author": [{"name": "A"}, {"name": "B"}]});
        assert_eq!(resolve(&data, "author.name"), Some("A, B".to_string()));
        assert_eq!(resolve(&data, "author.[].name"), Some("A, B".to_string()));
    }

    #[test]
    fn test_index_addressing() {
        let data = json!({"image": [{"url": "x"}, {"url": "y"}]});
        assert_eq!(resolve(&data, "image.[0].url"), Some("x".to_string()));
        assert_eq!(resolve(&data, "image.[1].url"), Some("y".to_string()));
        assert_eq!(resolve(&data, "image.[5].url"), None);
    }

    #[test]
    fn test_object_resolves_to_name_when_path_exhausted() {
        let data = json!({"author": {"@type": "Person", "name": "Jane"}});
        assert_eq!(resolve(&data, "author"), Some("Jane".to_string()));
    }

    #[test]
    fn test_scalar_array_terminal() {
        let data = json!({"keywords": ["rust", 2024, "html"]});
        assert_eq!(resolve(&data, "keywords"), Some("rust, 2024, html".to_string()));
    }

    #[test]
    fn test_deep_search_fallback() {
        let data = json!([
            {"@type": "WebPage", "breadcrumb": {"items": []}},
            {"@type": "NewsArticle", "meta": {"datePublished": "2024-01-02"}}
        ]);
        assert_eq!(resolve(&data, "datePublished"), Some("2024-01-02".to_string()));
    }

    #[test]
    fn test_missing_and_wrong_shape() {
        let data = json!({"author": 42, "title": null});
        assert_eq!(resolve(&data, "author.name"), None);
        assert_eq!(resolve(&data, "title"), None);
        assert_eq!(resolve(&json!("scalar"), "anything"), None);
    }

    #[test]
    fn test_empty_strings_are_filtered() {
        let data = json!({"author": [{"name": ""}, {"name": "B"}, {"name": "  "}]});
        assert_eq!(resolve(&data, "author.name"), Some("B".to_string()));
    }

    #[test]
    fn test_depth_ceiling_abandons_deep_branch() {
        let mut deep = json!({"name": "deep"});
        for _ in 0..30 {
            deep = json!({ "child": deep });
        }
        let data = json!([{"shallow": {"target": "found"}}, {"nested": deep}]);

        assert_eq!(resolve_with_depth(&data, "target", 10), Some("found".to_string()));
        assert_eq!(resolve_with_depth(&data, "name", 10), None);
        assert_eq!(resolve(&data, "name"), Some("deep".to_string()));

        let mut too_deep = json!({"name": "unreachable"});
        for _ in 0..(MAX_SCHEMA_DEPTH + 10) {
            too_deep = json!({ "child": too_deep });
        }
        assert_eq!(resolve(&too_deep, "name"), None);
    }

    #[test]
    fn test_collect_schema_org_data_flattens_graph() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@graph": [
                    {"@type": "WebSite", "name": "Site"},
                    {"@type": "Article", "headline": "Head"}
                ]}
            </script>
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">{"@type": "Person", "name": "Jane"}</script>
            </head><body></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let data = collect_schema_org_data(&doc).unwrap();
        let items = data.as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["@type"], "WebSite");
        assert_eq!(resolve(&data, "headline"), Some("Head".to_string()));
    }

    #[test]
    fn test_collect_schema_org_data_none() {
        let doc = Document::parse("<html><body><p>No data</p></body></html>").unwrap();
        assert!(collect_schema_org_data(&doc).is_none());
    }
}
