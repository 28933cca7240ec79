//! Tag normalization and tag slugs

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::collections::HashSet;

use super::BlogPostPreview;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new("[^a-z0-9]+").unwrap();
}

/// Clean up a tag list from front-matter.
///
/// Accepts a sequence (non-string elements are dropped), a single
/// comma-separated string, or anything else (treated as no tags). Values are
/// trimmed, empty ones discarded, and duplicates removed case-insensitively
/// keeping the first spelling in first-seen order.
pub fn normalize_tag_list(input: Option<&Value>) -> Vec<String> {
    let candidates: Vec<&str> = match input {
        Some(Value::Sequence(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(s)) => s.split(',').collect(),
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for candidate in candidates {
        let tag = candidate.trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_lowercase()) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// Turn a tag into a URL segment: `"C++ & Rust!"` becomes `"c-rust"`
pub fn tag_to_slug(tag: &str) -> String {
    let lower = tag.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// A tag and how many posts carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Count tags across posts, grouping by slug.
///
/// The first spelling seen for a slug names the group. Sorted by count
/// descending, then by slug.
pub fn tag_summary(posts: &[BlogPostPreview]) -> Vec<TagCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summary: Vec<TagCount> = Vec::new();

    for post in posts {
        // A post counts once per slug, even when two of its tags share one
        let mut seen: HashSet<String> = HashSet::new();
        for tag in &post.tags {
            let slug = tag_to_slug(tag);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }
            match index.get(&slug) {
                Some(&i) => summary[i].count += 1,
                None => {
                    index.insert(slug.clone(), summary.len());
                    summary.push(TagCount {
                        name: tag.clone(),
                        slug,
                        count: 1,
                    });
                }
            }
        }
    }

    summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.slug.cmp(&b.slug)));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[&str]) -> Value {
        Value::Sequence(items.iter().map(|s| Value::String(s.to_string())).collect())
    }

    fn preview(tags: &[&str]) -> BlogPostPreview {
        BlogPostPreview {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_dedupe_keeps_first_casing() {
        let tags = normalize_tag_list(Some(&seq(&["Go", "go", " GO "])));
        assert_eq!(tags, vec!["Go"]);
    }

    #[test]
    fn test_comma_separated_string() {
        let input = Value::String(" rust, Web ,,rust ,  ".to_string());
        assert_eq!(normalize_tag_list(Some(&input)), vec!["rust", "Web"]);
    }

    #[test]
    fn test_non_string_elements_dropped() {
        let input: Value = serde_yaml::from_str("[rust, 42, true, ~, [nested], wasm]").unwrap();
        assert_eq!(normalize_tag_list(Some(&input)), vec!["rust", "wasm"]);
    }

    #[test]
    fn test_absent_or_other_input() {
        assert!(normalize_tag_list(None).is_empty());
        assert!(normalize_tag_list(Some(&Value::Null)).is_empty());
        assert!(normalize_tag_list(Some(&Value::Bool(true))).is_empty());
        let map: Value = serde_yaml::from_str("a: b").unwrap();
        assert!(normalize_tag_list(Some(&map)).is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = vec![
            seq(&["  Rust ", "rust", "", "Async,IO", "async,io"]),
            Value::String("a, B ,b,  ,C".to_string()),
            Value::Null,
            seq(&[]),
        ];

        for input in inputs {
            let once = normalize_tag_list(Some(&input));
            let again = normalize_tag_list(Some(&Value::Sequence(
                once.iter().cloned().map(Value::String).collect(),
            )));
            assert_eq!(once, again);
        }
    }

    #[test]
    fn test_tag_to_slug() {
        assert_eq!(tag_to_slug("C++ & Rust!"), "c-rust");
        assert_eq!(tag_to_slug("Machine Learning"), "machine-learning");
        assert_eq!(tag_to_slug("--already-slugged--"), "already-slugged");
        assert_eq!(tag_to_slug("café"), "caf");
        assert_eq!(tag_to_slug(""), "");
        assert_eq!(tag_to_slug("!!!"), "");
    }

    #[test]
    fn test_tag_summary() {
        let posts = vec![
            preview(&["Rust", "Web"]),
            preview(&["rust"]),
            preview(&["C++", "web", "rust"]),
        ];

        let summary = tag_summary(&posts);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].name, "Rust");
        assert_eq!(summary[0].count, 3);
        assert_eq!(summary[1].slug, "web");
        assert_eq!(summary[1].count, 2);
        assert_eq!(summary[2].slug, "c");
    }

    #[test]
    fn test_tag_summary_counts_posts_not_tags() {
        let posts = vec![preview(&["C++", "C#"]), preview(&["c"])];

        let summary = tag_summary(&posts);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].slug, "c");
        assert_eq!(summary[0].name, "C++");
        assert_eq!(summary[0].count, 2);
    }
}
