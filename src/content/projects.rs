//! Projects backed by a directory of markdown files
//!
//! Unlike blog posts, project listings are always sorted: by `order`
//! ascending, then by title ignoring case and accents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::Result;
use super::frontmatter::{number_field, scalar_string, sequence_field, text_field};
use super::scan::{warn_duplicate_slugs, ContentDir, ContentFile};
use crate::cache::ListingCache;

/// Order given to projects without a usable `order` field
pub const DEFAULT_ORDER: f64 = 1000.0;

/// The closed set of project categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Work,
    Academic,
    #[default]
    Personal,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 3] = [
        ProjectCategory::Work,
        ProjectCategory::Academic,
        ProjectCategory::Personal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectCategory::Work => "work",
            ProjectCategory::Academic => "academic",
            ProjectCategory::Personal => "personal",
        }
    }

    /// Match a category name, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(input))
    }

    /// Category from a front-matter value; anything unrecognised is `Personal`
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(scalar_string)
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project metadata without the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPreview {
    pub title: String,
    pub description: String,
    /// Sort priority, lower first
    #[serde(serialize_with = "serialize_order")]
    pub order: f64,
    /// As written, not deduplicated
    pub tags: Vec<String>,
    pub category: ProjectCategory,
    pub slug: String,
    /// `/projects/{slug}`
    pub path: String,
}

/// A project with its markdown body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub preview: ProjectPreview,
    pub content: String,
}

/// Project listings bucketed by category, keys in `ProjectCategory::ALL` order
pub type GroupedProjects = IndexMap<ProjectCategory, Vec<ProjectPreview>>;

/// Whole orders serialize as integers so `1000` does not become `1000.0`
fn serialize_order<S: Serializer>(order: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if order.fract() == 0.0 && order.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*order as i64)
    } else {
        serializer.serialize_f64(*order)
    }
}

/// Front-matter fields a project reads, with their defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFrontMatter {
    pub title: String,
    pub description: String,
    pub order: f64,
    pub tags: Vec<String>,
    pub category: ProjectCategory,
}

impl ProjectFrontMatter {
    pub fn from_mapping(data: &Mapping) -> Self {
        Self {
            title: text_field(data, "title"),
            description: text_field(data, "description"),
            order: number_field(data, "order").unwrap_or(DEFAULT_ORDER),
            tags: sequence_field(data, "tags"),
            category: ProjectCategory::from_value(data.get("category")),
        }
    }

    fn into_preview(self, slug: &str) -> ProjectPreview {
        ProjectPreview {
            title: self.title,
            description: self.description,
            order: self.order,
            tags: self.tags,
            category: self.category,
            slug: slug.to_string(),
            path: format!("/projects/{}", slug),
        }
    }
}

/// Listing order: `order` ascending, then title ignoring case and accents
pub fn compare_projects(a: &ProjectPreview, b: &ProjectPreview) -> Ordering {
    a.order
        .total_cmp(&b.order)
        .then_with(|| title_key(&a.title).cmp(&title_key(&b.title)))
}

fn title_key(title: &str) -> String {
    deunicode::deunicode(title).to_lowercase()
}

/// Read model over the projects content directory
#[derive(Debug)]
pub struct ProjectStore {
    dir: ContentDir,
    cache: Option<ListingCache<ProjectPreview>>,
}

impl ProjectStore {
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

    /// Keep the sorted listing in memory until [`ProjectStore::invalidate`]
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

    /// All project previews, sorted
    pub fn list_project_previews(&self) -> Result<Vec<ProjectPreview>> {
        // Listings of a missing root are never cached
        match &self.cache {
            Some(cache) if self.dir.root().is_dir() => {
                Ok(cache.get_or_load(|| self.load_sorted())?.to_vec())
            }
            _ => self.load_sorted(),
        }
    }

    /// The project whose derived slug is `slug`, with its body
    pub fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let Some(file) = self.dir.find(slug)? else {
            return Ok(None);
        };
        let doc = file.read()?;
        Ok(Some(Project {
            preview: ProjectFrontMatter::from_mapping(&doc.data).into_preview(&file.slug),
            content: doc.body,
        }))
    }

    /// Sorted previews in `category`. Unknown category names match nothing.
    pub fn list_projects_by_category(&self, category: &str) -> Result<Vec<ProjectPreview>> {
        let Some(category) = ProjectCategory::parse(category) else {
            return Ok(Vec::new());
        };
        let mut projects = self.list_project_previews()?;
        projects.retain(|p| p.category == category);
        Ok(projects)
    }

    /// Sorted previews split into the three category buckets.
    ///
    /// Every bucket is present, possibly empty, and keeps the listing order.
    pub fn list_projects_grouped_by_category(&self) -> Result<GroupedProjects> {
        let mut grouped: GroupedProjects = ProjectCategory::ALL
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();

        for project in self.list_project_previews()? {
            grouped.entry(project.category).or_default().push(project);
        }

        Ok(grouped)
    }

    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
    }

    fn load_sorted(&self) -> Result<Vec<ProjectPreview>> {
        let files = self.dir.files()?;
        warn_duplicate_slugs(&self.dir, &files);

        let mut projects = files
            .iter()
            .map(load_preview)
            .collect::<Result<Vec<_>>>()?;
        projects.sort_by(compare_projects);
        Ok(projects)
    }
}

fn load_preview(file: &ContentFile) -> Result<ProjectPreview> {
    let doc = file.read()?;
    Ok(ProjectFrontMatter::from_mapping(&doc.data).into_preview(&file.slug))
}
