//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub url: String,

    // Directory
    pub blog_dir: String,
    pub projects_dir: String,
    pub public_dir: String,

    // Content
    /// File extensions read as content, without the dot
    pub markdown_extensions: Vec<String>,
    /// Keep listings in memory until the content changes
    pub cache: bool,

    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            author: String::new(),
            url: "http://localhost:4000".to_string(),

            blog_dir: "content/blog".to_string(),
            projects_dir: "content/projects".to_string(),
            public_dir: "public".to_string(),

            markdown_extensions: vec!["md".to_string()],
            cache: false,

            theme: ThemeConfig::default(),
            server: ServerConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Theme persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme used when the visitor has not picked one
    pub default: String,
    /// Selectable themes; empty accepts any well-formed name
    #[serde(default)]
    pub available: Vec<String>,
    /// Cookie holding the visitor's choice
    pub cookie: String,
    /// URL directory holding `{theme}.css`
    pub css_dir: String,
    pub max_age_days: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: "monochrome".to_string(),
            available: Vec::new(),
            cookie: "theme".to_string(),
            css_dir: "/css/themes".to_string(),
            max_age_days: 365,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.blog_dir, "content/blog");
        assert_eq!(config.projects_dir, "content/projects");
        assert_eq!(config.markdown_extensions, vec!["md"]);
        assert_eq!(config.theme.default, "monochrome");
        assert_eq!(config.server.port, 4000);
        assert!(!config.cache);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Site
blog_dir: posts
markdown_extensions: [md, mdx]
cache: true
theme:
  default: dracula
  available: [dracula, monochrome]
server:
  port: 8080
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.blog_dir, "posts");
        assert_eq!(config.projects_dir, "content/projects");
        assert_eq!(config.markdown_extensions, vec!["md", "mdx"]);
        assert!(config.cache);
        assert_eq!(config.theme.default, "dracula");
        assert_eq!(config.theme.cookie, "theme");
        assert_eq!(config.theme.available.len(), 2);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "title: From Disk\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "From Disk");

        fs::write(&path, "title: [broken\n").unwrap();
        assert!(SiteConfig::load(&path).is_err());
    }
}
