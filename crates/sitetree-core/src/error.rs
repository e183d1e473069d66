use std::path::PathBuf;

use crate::model::Route;

/// Everything that can abort a scan.
///
/// None of these are tolerated partially: a scan that hits one publishes
/// nothing, and whoever triggered it keeps the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("invalid path segment {segment:?}: normalizes to an empty title or route")]
    InvalidSegment { segment: String },

    #[error("invalid path segment {segment:?} in {path}")]
    InvalidPath { path: PathBuf, segment: String },

    #[error("cannot read {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("route {route} is claimed by both {first} and {second}")]
    RouteCollision {
        route: Route,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SiteError {
    pub(crate) fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Scan {
            path: path.into(),
            source,
        }
    }

    /// Attach the offending file to a bare `InvalidSegment`.
    pub(crate) fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            SiteError::InvalidSegment { segment } => SiteError::InvalidPath {
                path: path.into(),
                segment,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
