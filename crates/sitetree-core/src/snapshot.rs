use log::info;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::model::{FileNode, FolderNode};
use crate::nav::NavTree;
use crate::route_index::RouteIndex;
use crate::tree::TreeBuilder;
use crate::vfs::FileSystem;

/// The complete, immutable result of one scan.
///
/// Rescanning never touches an existing snapshot; it produces a new one that
/// replaces the old value wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(skip)]
    root: FolderNode,
    routes: RouteIndex,
    nav: NavTree,
    fingerprint: String,
}

impl Snapshot {
    /// Tree Builder -> Route Index -> Navigation Projector, in one pass.
    pub fn scan(config: &SiteConfig, fs: &dyn FileSystem) -> Result<Self> {
        let started = Instant::now();

        let root = TreeBuilder::new(config, fs).build()?;
        let snapshot = Self::from_tree(root)?;

        info!(
            "scanned {}: {} documents in {:?}",
            config.content.root.display(),
            snapshot.document_count(),
            started.elapsed()
        );
        Ok(snapshot)
    }

    pub fn from_tree(root: FolderNode) -> Result<Self> {
        let routes = RouteIndex::build(&root)?;
        let nav = NavTree::project(&root);
        let fingerprint = fingerprint(&routes);

        Ok(Self {
            root,
            routes,
            nav,
            fingerprint,
        })
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn routes(&self) -> &RouteIndex {
        &self.routes
    }

    pub fn nav(&self) -> &NavTree {
        &self.nav
    }

    /// SHA-256 over every route and document digest, in index order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn get(&self, route: &str) -> Option<&Arc<FileNode>> {
        self.routes.get(route)
    }

    pub fn document_count(&self) -> usize {
        self.routes.len()
    }
}

fn fingerprint(routes: &RouteIndex) -> String {
    let mut hasher = Sha256::new();
    for file in routes.iter() {
        hasher.update(file.route.as_str());
        hasher.update([0u8]);
        hasher.update(&file.digest);
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
