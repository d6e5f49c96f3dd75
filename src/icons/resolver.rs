//! Icon Resolver - technology name to candidate icon URLs.
//!
//! Two sources:
//!
//! - **Curated index** for a small allow-list (Java, Convex, AWS). Matched by
//!   normalized title: canonical override first, then aliases, then spelling
//!   heuristics. Yields at most one URL.
//! - **Slug CDN** for everything else: a static name → slugs table, defaulting
//!   to the lowercased name, one URL per slug. Never touches the index.
//!
//! Resolution is a pure function of the name and an [`IndexSnapshot`]. An
//! allow-listed name resolves to nothing until the snapshot is `Ready`.

use std::collections::HashMap;

use super::cache::IndexSnapshot;
use super::index::IconIndexEntry;
use super::normalize::{heuristic_variants, titles_match};
use crate::config::ResolverConfig;

// =============================================================================
// TABLES
// =============================================================================

struct CuratedEntry {
    key: &'static str,
    title: &'static str,
    aliases: &'static [&'static str],
}

/// Technologies resolved through the curated index, with their canonical
/// index title and extra aliases.
static CURATED: &[CuratedEntry] = &[
    CuratedEntry {
        key: "aws",
        title: "Amazon Web Services",
        aliases: &["AWS", "Amazon Web Services"],
    },
    CuratedEntry {
        key: "convex",
        title: "Convex",
        aliases: &["Convex", "Convex DB", "ConvexDB"],
    },
    CuratedEntry {
        key: "java",
        title: "Java",
        aliases: &["Java", "OpenJDK"],
    },
];

/// Slug candidates for the CDN, tried in order. An empty list means the
/// technology never shows an icon.
const SLUGS: &[(&str, &[&str])] = &[
    ("python", &["python"]),
    ("fastapi", &["fastapi"]),
    ("c", &["c"]),
    ("react", &["react"]),
    ("tailwindcss", &["tailwindcss"]),
    ("git", &["git"]),
    ("clerk", &["clerk"]),
    ("mysql", &["mysql"]),
    ("bash", &["gnubash", "bash"]),
    ("convexdb", &[]),
];

// =============================================================================
// RESOLVED ICON
// =============================================================================

/// Ordered candidate URLs for one technology. Possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedIcon {
    candidates: Vec<String>,
}

impl ResolvedIcon {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_candidates(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn first(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Maps display names to candidate URLs.
///
/// Holds only static tables and the CDN base; cheap to clone and share.
#[derive(Clone)]
pub struct IconResolver {
    cdn_base: String,
    curated: HashMap<&'static str, &'static CuratedEntry>,
    slugs: HashMap<&'static str, &'static [&'static str]>,
}

impl IconResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_cdn_base(config.cdn_base())
    }

    pub fn with_cdn_base(cdn_base: &str) -> Self {
        let curated = CURATED.iter().map(|entry| (entry.key, entry)).collect();
        let slugs = SLUGS.iter().copied().collect();

        Self {
            cdn_base: cdn_base.trim_end_matches('/').to_string(),
            curated,
            slugs,
        }
    }

    /// Whether `name` is resolved through the curated index.
    pub fn is_curated(&self, name: &str) -> bool {
        self.curated.contains_key(name.to_lowercase().as_str())
    }

    /// Resolve `name` against the given index snapshot.
    pub fn resolve(&self, name: &str, snapshot: &IndexSnapshot) -> ResolvedIcon {
        let key = name.to_lowercase();

        match self.curated.get(key.as_str()) {
            Some(entry) => match snapshot.index() {
                Some(index) => find_curated(entry, index)
                    .map(|url| ResolvedIcon::from_candidates(vec![url.to_string()]))
                    .unwrap_or_default(),
                None => ResolvedIcon::none(),
            },
            None => self.cdn_candidates(&key),
        }
    }

    /// CDN URLs for a lowercased key.
    fn cdn_candidates(&self, key: &str) -> ResolvedIcon {
        let urls = match self.slugs.get(key) {
            Some(slugs) => slugs.iter().map(|slug| self.cdn_url(slug)).collect(),
            None => vec![self.cdn_url(key)],
        };
        ResolvedIcon::from_candidates(urls)
    }

    /// `{cdn_base}/{slug}`, with the slug percent-encoded.
    pub fn cdn_url(&self, slug: &str) -> String {
        format!("{}/{}", self.cdn_base, urlencoding::encode(slug))
    }
}

impl std::fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconResolver")
            .field("cdn_base", &self.cdn_base)
            .finish_non_exhaustive()
    }
}

/// Canonical title, then aliases, then heuristic variants. First entry with a
/// usable route wins at each stage; a title match without one does not stop
/// the search.
fn find_curated<'a>(entry: &CuratedEntry, index: &'a [IconIndexEntry]) -> Option<&'a str> {
    let lookup = |title: &str| {
        index
            .iter()
            .filter(|it| titles_match(&it.title, title))
            .find_map(IconIndexEntry::url)
    };

    lookup(entry.title)
        .or_else(|| entry.aliases.iter().find_map(|alias| lookup(alias)))
        .or_else(|| {
            heuristic_variants(entry.title)
                .iter()
                .find_map(|variant| lookup(variant))
        })
}

// =============================================================================
// TESTS
// =============================================================================
