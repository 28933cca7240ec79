//! Blog posts backed by a directory of markdown files

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};

use super::date::parse_date;
use super::error::Result;
use super::frontmatter::{string_or_sequence_field, text_field};
use super::scan::{warn_duplicate_slugs, ContentDir, ContentFile};
use super::tags::{normalize_tag_list, tag_to_slug};
use crate::cache::ListingCache;

/// Blog post metadata without the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPostPreview {
    pub title: String,
    pub description: String,
    /// Free-form, not validated
    pub date: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub slug: String,
    /// `/blog/{slug}`
    pub path: String,
}

/// A blog post with its markdown body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(flatten)]
    pub preview: BlogPostPreview,
    /// Raw markdown, front-matter stripped
    pub content: String,
}

/// Front-matter fields a blog post reads, with their defaults applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFrontMatter {
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl BlogFrontMatter {
    pub fn from_mapping(data: &Mapping) -> Self {
        Self {
            title: text_field(data, "title"),
            description: text_field(data, "description"),
            date: text_field(data, "date"),
            tags: normalize_tag_list(data.get("tags")),
            categories: string_or_sequence_field(data, "categories"),
        }
    }

    fn into_preview(self, slug: &str) -> BlogPostPreview {
        BlogPostPreview {
            title: self.title,
            description: self.description,
            date: self.date,
            tags: self.tags,
            categories: self.categories,
            slug: slug.to_string(),
            path: blog_path(slug),
        }
    }
}

fn blog_path(slug: &str) -> String {
    format!("/blog/{}", slug)
}

impl BlogPostPreview {
    /// The `date` field parsed, if it is in a recognised format
    pub fn parsed_date(&self) -> Option<chrono::NaiveDateTime> {
        parse_date(&self.date)
    }

    /// Whether any tag slugifies to `slug`
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| tag_to_slug(t) == slug)
    }
}

/// Sort posts newest first. Posts with unparseable dates go last, in their
/// original order.
pub fn sort_newest_first(posts: &mut [BlogPostPreview]) {
    posts.sort_by_cached_key(|p| std::cmp::Reverse(p.parsed_date()));
}

/// Read model over the blog content directory
#[derive(Debug)]
pub struct BlogStore {
    dir: ContentDir,
    cache: Option<ListingCache<BlogPostPreview>>,
}

impl BlogStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            dir: ContentDir::new(root),
            cache: None,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dir = self.dir.with_extensions(extensions);
        self
    }

    /// Keep the post listing in memory until [`BlogStore::invalidate`]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(ListingCache::new);
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.root()
    }

    pub(crate) fn content_dir(&self) -> &ContentDir {
        &self.dir
    }

    /// All post previews in directory order. No date sort is applied.
    pub fn list_posts(&self) -> Result<Vec<BlogPostPreview>> {
        // Listings of a missing root are never cached
        match &self.cache {
            Some(cache) if self.dir.root().is_dir() => {
                Ok(cache.get_or_load(|| self.load_previews())?.to_vec())
            }
            _ => self.load_previews(),
        }
    }

    /// The post whose derived slug is `slug`, with its body
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let Some(file) = self.dir.find(slug)? else {
            return Ok(None);
        };
        let doc = file.read()?;
        Ok(Some(BlogPost {
            preview: BlogFrontMatter::from_mapping(&doc.data).into_preview(&file.slug),
            content: doc.body,
        }))
    }

    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
    }

    fn load_previews(&self) -> Result<Vec<BlogPostPreview>> {
        let files = self.dir.files()?;
        warn_duplicate_slugs(&self.dir, &files);
        files.iter().map(load_preview).collect()
    }
}

fn load_preview(file: &ContentFile) -> Result<BlogPostPreview> {
    let doc = file.read()?;
    Ok(BlogFrontMatter::from_mapping(&doc.data).into_preview(&file.slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentError;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn preview_with_date(slug: &str, date: &str) -> BlogPostPreview {
        BlogPostPreview {
            slug: slug.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = BlogStore::new(tmp.path().join("blog"));
        assert!(store.list_posts().unwrap().is_empty());
        assert!(store.get_post_by_slug("hello").unwrap().is_none());
    }

    #[test]
    fn test_list_posts() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "2023-10-25-vue-chatbot.md",
            r#"---
title: Building a Chatbot
description: Vue and websockets
date: 2023-10-25
tags: [Vue, vue, " WebSockets "]
categories:
  - Frontend
---

Body text.
"#,
        );
        write(tmp.path(), "bare.md", "Just a body.");
        write(tmp.path(), "ignored.txt", "---\ntitle: no\n---\n");

        let posts = BlogStore::new(tmp.path()).list_posts().unwrap();
        assert_eq!(posts.len(), 2);

        let post = posts.iter().find(|p| p.slug == "vue-chatbot").unwrap();
        assert_eq!(post.title, "Building a Chatbot");
        assert_eq!(post.description, "Vue and websockets");
        assert_eq!(post.date, "2023-10-25");
        assert_eq!(post.tags, vec!["Vue", "WebSockets"]);
        assert_eq!(post.categories, vec!["Frontend"]);
        assert_eq!(post.path, "/blog/vue-chatbot");

        let bare = posts.iter().find(|p| p.slug == "bare").unwrap();
        assert_eq!(bare.title, "");
        assert_eq!(bare.date, "");
        assert!(bare.tags.is_empty());
        assert!(bare.categories.is_empty());
    }

    #[test]
    fn test_comma_separated_tags_and_single_category() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "notes.md",
            "---\ntags: rust, Rust , async\ncategories: Notes\n---\n",
        );

        let posts = BlogStore::new(tmp.path()).list_posts().unwrap();
        assert_eq!(posts[0].tags, vec!["rust", "async"]);
        assert_eq!(posts[0].categories, vec!["Notes"]);
    }

    #[test]
    fn test_get_post_by_slug() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "2024-02-01-hello-world.md",
            "---\ntitle: Hello\n---\n# Hello\n\nWorld.\n",
        );

        let store = BlogStore::new(tmp.path());
        let post = store.get_post_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(post.preview.title, "Hello");
        assert_eq!(post.preview.slug, "hello-world");
        assert_eq!(post.preview.path, "/blog/hello-world");
        assert_eq!(post.content, "# Hello\n\nWorld.\n");

        assert!(store.get_post_by_slug("2024-02-01-hello-world").unwrap().is_none());
        assert!(store.get_post_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_malformed_frontmatter_fails_listing() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", "---\ntitle: Good\n---\n");
        write(tmp.path(), "bad.md", "---\ntitle: [broken\n---\n");

        let err = BlogStore::new(tmp.path()).list_posts().unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
        assert!(err.path().ends_with("bad.md"));
    }

    #[test]
    fn test_cache_until_invalidated() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "one.md", "---\ntitle: One\n---\n");

        let store = BlogStore::new(tmp.path()).with_cache(true);
        assert_eq!(store.list_posts().unwrap().len(), 1);

        write(tmp.path(), "two.md", "---\ntitle: Two\n---\n");
        assert_eq!(store.list_posts().unwrap().len(), 1);

        store.invalidate();
        assert_eq!(store.list_posts().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_root_is_not_cached() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blog");

        let store = BlogStore::new(&root).with_cache(true);
        assert!(store.list_posts().unwrap().is_empty());

        std::fs::create_dir_all(&root).unwrap();
        write(&root, "late.md", "---\ntitle: Late\n---\n");
        let posts = store.list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "late");
    }

    #[test]
    fn test_read_through_by_default() {
        let tmp = TempDir::new().unwrap();
        let store = BlogStore::new(tmp.path());
        assert!(store.list_posts().unwrap().is_empty());

        write(tmp.path(), "new.md", "---\ntitle: New\n---\n");
        assert_eq!(store.list_posts().unwrap().len(), 1);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            preview_with_date("undated", "someday"),
            preview_with_date("old", "2021-03-01"),
            preview_with_date("new", "2024-06-30 08:00:00"),
            preview_with_date("mid", "2023/01/01"),
        ];
        sort_newest_first(&mut posts);
        let order: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old", "undated"]);
    }

    #[test]
    fn test_has_tag() {
        let post = BlogPostPreview {
            tags: vec!["C++ & Rust!".to_string()],
            ..Default::default()
        };
        assert!(post.has_tag("c-rust"));
        assert!(!post.has_tag("rust"));
    }
}
