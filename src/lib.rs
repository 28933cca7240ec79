//! folio-rs: content layer for a personal website
//!
//! Blog posts and projects are markdown files with YAML front-matter. This
//! crate reads them into typed records, serves them as JSON, and keeps the
//! visitor's theme choice in a cookie.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{BlogStore, ProjectStore};

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog posts directory
    pub blog_dir: PathBuf,
    /// Projects directory
    pub projects_dir: PathBuf,
    /// Static files served as-is
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let blog_dir = base_dir.join(&config.blog_dir);
        let projects_dir = base_dir.join(&config.projects_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            blog_dir,
            projects_dir,
            public_dir,
        }
    }

    /// Blog store over `blog_dir`
    pub fn blog(&self) -> BlogStore {
        BlogStore::new(&self.blog_dir)
            .with_extensions(&self.config.markdown_extensions)
            .with_cache(self.config.cache)
    }

    /// Project store over `projects_dir`
    pub fn projects(&self) -> ProjectStore {
        ProjectStore::new(&self.projects_dir)
            .with_extensions(&self.config.markdown_extensions)
            .with_cache(self.config.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.blog_dir, tmp.path().join("content/blog"));
        assert_eq!(folio.projects_dir, tmp.path().join("content/projects"));
        assert!(folio.blog().list_posts().unwrap().is_empty());
    }

    #[test]
    fn test_config_file_moves_content_roots() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(
            tmp.path().join("_config.yml"),
            "blog_dir: writing\nmarkdown_extensions: [mdx]\n",
        )
        .unwrap();
        fs::create_dir(tmp.path().join("writing")).unwrap();
        fs::write(tmp.path().join("writing/hello.mdx"), "---\ntitle: Hi\n---\n").unwrap();
        fs::write(tmp.path().join("writing/skip.md"), "---\ntitle: No\n---\n").unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        let posts = folio.blog().list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello");
    }
}
