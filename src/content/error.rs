//! Errors raised while reading content

use std::path::PathBuf;
use thiserror::Error;

use super::frontmatter::FrontMatterError;

/// Failure to read or parse a content file.
///
/// A missing content directory or an unknown slug is not an error; stores
/// report those as an empty list or `None`.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front-matter in {}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

impl ContentError {
    /// The file (or directory) the error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            ContentError::Io { path, .. } | ContentError::FrontMatter { path, .. } => path.as_path(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
