//! Icon index records as served by the curated icon API.

use serde::{Deserialize, Deserializer};

/// Route of an index entry: either a single URL or per-theme URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IconRoute {
    Single(String),
    Themed {
        light: String,
        #[serde(default)]
        dark: Option<String>,
    },
}

impl IconRoute {
    /// URL to display. Themed routes use the light variant.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            IconRoute::Single(url) => url,
            IconRoute::Themed { light, .. } => light,
        };
        (!url.is_empty()).then_some(url.as_str())
    }
}

/// One curated icon. Extra fields in the payload (category, wordmark, ...)
/// are ignored. A malformed route only makes its own entry unusable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IconIndexEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_route")]
    pub route: Option<IconRoute>,
}

fn lenient_route<'de, D>(deserializer: D) -> Result<Option<IconRoute>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(IconRoute::deserialize(value).ok())
}

impl IconIndexEntry {
    pub fn new(title: impl Into<String>, route: IconRoute) -> Self {
        Self {
            title: title.into(),
            route: Some(route),
        }
    }

    /// The displayable URL, if the entry has a usable route.
    pub fn url(&self) -> Option<&str> {
        self.route.as_ref().and_then(IconRoute::url)
    }
}

/// The full index, immutable once fetched.
pub type IconIndex = Vec<IconIndexEntry>;

/// Decode an index payload.
pub fn parse_index(body: &[u8]) -> serde_json::Result<IconIndex> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_routes() {
        let body = br#"[
            {"id": 1, "title": "Amazon Web Services", "category": "Software",
             "route": {"light": "https://svgl.app/aws_light.svg", "dark": "https://svgl.app/aws_dark.svg"}},
            {"id": 2, "title": "Java", "route": "https://svgl.app/java.svg", "url": "https://java.com"},
            {"id": 3, "title": "Broken"}
        ]"#;

        let index = parse_index(body).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index[0].url(), Some("https://svgl.app/aws_light.svg"));
        assert_eq!(index[1].url(), Some("https://svgl.app/java.svg"));
        assert_eq!(index[2].url(), None);
    }

    #[test]
    fn test_bad_route_skips_only_its_entry() {
        let body = br#"[
            {"title": "Java", "route": "https://x/java.svg"},
            {"title": "Odd", "route": {"dark": "https://x/odd_dark.svg"}},
            {"title": "Numeric", "route": 42},
            {"route": "https://x/untitled.svg"}
        ]"#;

        let index = parse_index(body).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index[0].url(), Some("https://x/java.svg"));
        assert_eq!(index[1].route, None);
        assert_eq!(index[2].url(), None);
        assert_eq!(index[3].title, "");
    }

    #[test]
    fn test_themed_route_without_dark() {
        let entry: IconIndexEntry =
            serde_json::from_str(r#"{"title": "Convex", "route": {"light": "https://x/c.svg"}}"#)
                .unwrap();
        assert_eq!(
            entry.route,
            Some(IconRoute::Themed {
                light: "https://x/c.svg".to_string(),
                dark: None
            })
        );
    }

    #[test]
    fn test_empty_route_is_unusable() {
        let entry = IconIndexEntry::new("Empty", IconRoute::Single(String::new()));
        assert_eq!(entry.url(), None);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_index(br#"{"error": "rate limited"}"#).is_err());
    }
}
