//! Content module - blog posts, projects, and the pieces they share

mod blog;
mod date;
mod error;
mod frontmatter;
mod markdown;
mod projects;
mod scan;
mod tags;

pub use blog::{sort_newest_first, BlogFrontMatter, BlogPost, BlogPostPreview, BlogStore};
pub use date::parse_date;
pub use error::{ContentError, Result};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use markdown::MarkdownRenderer;
pub use projects::{
    compare_projects, GroupedProjects, Project, ProjectCategory, ProjectFrontMatter,
    ProjectPreview, ProjectStore, DEFAULT_ORDER,
};
pub use scan::{derive_slug, duplicate_slugs, ContentDir, ContentFile, Document};
pub use tags::{normalize_tag_list, tag_summary, tag_to_slug, TagCount};
