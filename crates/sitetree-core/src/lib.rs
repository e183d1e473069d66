//! Sitetree Core Library
//!
//! Maps a directory of Markdown notes onto a site: routes, a route index and
//! a navigation tree. Filesystem access goes through `vfs::FileSystem`; no
//! rendering happens here.
//!

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod model;
pub mod nav;
pub mod normalize;
pub mod route_index;
pub mod snapshot;
pub mod tree;
pub mod vfs;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use model::{FileNode, FolderNode, FrontMatter, Node, Route};
pub use nav::{Crumb, NavKind, NavNode, NavTree};
pub use normalize::{normalize_segment, Segment, SegmentKind};
pub use route_index::RouteIndex;
pub use snapshot::Snapshot;
pub use vfs::{FileSystem, PhysicalFileSystem};
