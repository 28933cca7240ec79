//! Content directory scanning and slug derivation

use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Mapping;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::frontmatter::FrontMatter;

lazy_static! {
    static ref DATE_PREFIX: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").unwrap();
}

/// Derive a slug from a file name.
///
/// Strips an optional `YYYY-MM-DD-` prefix and the file extension:
/// `2024-01-01-my-project.md` becomes `my-project`.
pub fn derive_slug(file_name: &str) -> String {
    let name = DATE_PREFIX.replace(file_name, "");
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name.into_owned(),
    }
}

/// A directory of markdown files, read without recursion
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
    extensions: Vec<String>,
}

/// A markdown file found in a content directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    pub file_name: String,
    pub slug: String,
}

/// Owned front-matter and body of a content file
#[derive(Debug, Clone)]
pub struct Document {
    pub data: Mapping,
    pub body: String,
}

impl ContentDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["md".to_string()],
        }
    }

    /// Replace the accepted file extensions (without the leading dot)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `file_name` ends with one of the accepted extensions
    pub fn accepts(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| {
            file_name
                .strip_suffix(ext.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }

    /// List markdown files, ordered by file name.
    ///
    /// A missing directory yields an empty list.
    pub fn files(&self) -> Result<Vec<ContentFile>> {
        if !self.root.exists() {
            tracing::debug!("Content directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                ContentError::Io {
                    path,
                    source: e.into(),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };

            if self.accepts(file_name) {
                files.push(ContentFile {
                    path: entry.path().to_path_buf(),
                    file_name: file_name.to_string(),
                    slug: derive_slug(file_name),
                });
            }
        }

        Ok(files)
    }

    /// The first file whose derived slug equals `slug`
    pub fn find(&self, slug: &str) -> Result<Option<ContentFile>> {
        Ok(self.files()?.into_iter().find(|f| f.slug == slug))
    }
}

impl ContentFile {
    /// Read the file and split its front-matter from the body
    pub fn read(&self) -> Result<Document> {
        let text = fs::read_to_string(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;

        let fm = FrontMatter::parse(&text).map_err(|source| ContentError::FrontMatter {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Parsed {:?}", self.path);

        Ok(Document {
            body: fm.body.to_string(),
            data: fm.data,
        })
    }
}

/// Slugs shared by more than one file, with the files that share them
pub fn duplicate_slugs(files: &[ContentFile]) -> Vec<(String, Vec<String>)> {
    let mut by_slug: HashMap<&str, Vec<String>> = HashMap::new();
    for file in files {
        by_slug
            .entry(file.slug.as_str())
            .or_default()
            .push(file.file_name.clone());
    }

    let mut duplicates: Vec<(String, Vec<String>)> = by_slug
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(slug, names)| (slug.to_string(), names))
        .collect();
    duplicates.sort();
    duplicates
}

/// Log a warning for every slug shared by several files
pub(crate) fn warn_duplicate_slugs(dir: &ContentDir, files: &[ContentFile]) {
    for (slug, names) in duplicate_slugs(files) {
        tracing::warn!(
            "Duplicate slug '{}' in {:?}: {} (lookups resolve to {})",
            slug,
            dir.root(),
            names.join(", "),
            names[0]
        );
    }
}
