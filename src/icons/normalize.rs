//! Title normalization for matching display names against index titles.

/// Separators treated like whitespace.
const SEPARATORS: &[char] = &['.', '_', '-', '/'];

/// Lowercase, collapse every run of whitespace and separator punctuation into
/// a single space, and trim.
///
/// `"Amazon  Web-Services"` and `"amazon web services"` normalize the same.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for c in s.chars() {
        if c.is_whitespace() || SEPARATORS.contains(&c) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(c.to_lowercase());
    }

    out
}

/// Whether two titles are equal after normalization.
pub fn titles_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Spelling variants tried when neither the canonical title nor an alias
/// matched: as-is, whitespace removed, whitespace as `-`, whitespace as `.`.
pub fn heuristic_variants(title: &str) -> [String; 4] {
    let words: Vec<&str> = title.split_whitespace().collect();
    [
        title.to_string(),
        words.concat(),
        words.join("-"),
        words.join("."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_trim() {
        assert_eq!(normalize("  Java "), "java");
        assert_eq!(normalize("AWS"), "aws");
    }

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(normalize("Amazon  Web\tServices"), "amazon web services");
        assert_eq!(normalize("Convex-DB"), "convex db");
        assert_eq!(normalize("node.js"), "node js");
        assert_eq!(normalize("a - b"), "a b");
        assert_eq!(normalize("__init__"), "init");
        assert_eq!(normalize("CI/CD"), "ci cd");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" -_/ "), "");
    }

    #[test]
    fn test_titles_match() {
        assert!(titles_match("Amazon Web Services", "amazon-web-services"));
        assert!(titles_match("ConvexDB", "convexdb"));
        assert!(!titles_match("ConvexDB", "Convex DB"));
    }

    #[test]
    fn test_heuristic_variants() {
        let variants = heuristic_variants("Amazon Web Services");
        assert_eq!(
            variants,
            [
                "Amazon Web Services".to_string(),
                "AmazonWebServices".to_string(),
                "Amazon-Web-Services".to_string(),
                "Amazon.Web.Services".to_string(),
            ]
        );
    }
}
