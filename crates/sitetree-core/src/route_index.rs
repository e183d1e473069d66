use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SiteError};
use crate::model::{FileNode, FolderNode, Route};

/// Flat lookup from route to document, in depth-first sibling order.
#[derive(Debug, Clone, Default)]
pub struct RouteIndex {
    order: Vec<Route>,
    by_route: HashMap<Route, Arc<FileNode>>,
}

impl RouteIndex {
    /// Index every document under `root`, rejecting duplicate routes.
    pub fn build(root: &FolderNode) -> Result<Self> {
        let mut index = RouteIndex::default();
        for file in root.documents() {
            index.insert(Arc::clone(file))?;
        }
        Ok(index)
    }

    fn insert(&mut self, file: Arc<FileNode>) -> Result<()> {
        if let Some(existing) = self.by_route.get(&file.route) {
            return Err(SiteError::RouteCollision {
                route: file.route.clone(),
                first: existing.path.clone(),
                second: file.path.clone(),
            });
        }
        self.order.push(file.route.clone());
        self.by_route.insert(file.route.clone(), file);
        Ok(())
    }

    /// Exact lookup. Unknown routes are the caller's problem.
    pub fn get(&self, route: &str) -> Option<&Arc<FileNode>> {
        self.by_route.get(route)
    }

    pub fn contains(&self, route: &str) -> bool {
        self.by_route.contains_key(route)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FileNode>> {
        self.order.iter().filter_map(|route| self.by_route.get(route))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for RouteIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::tree::TreeBuilder;
    use crate::vfs::PhysicalFileSystem;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("# {}", rel)).unwrap();
    }

    fn index(root: &Path) -> Result<RouteIndex> {
        let config = SiteConfig::with_root(root);
        let tree = TreeBuilder::new(&config, &PhysicalFileSystem::default()).build()?;
        RouteIndex::build(&tree)
    }

    #[test]
    fn test_index_folding_routes() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/guide/index.md");
        write(temp.path(), "docs/guide/setup.md");

        let index = index(temp.path()).unwrap();
        let routes: Vec<_> = index.routes().map(|r| r.as_str()).collect();
        assert_eq!(routes, vec!["/docs/guide", "/docs/guide/setup"]);
    }

    #[test]
    fn test_every_entry_maps_back_to_its_route() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.md");
        write(temp.path(), "02. Later/b.md");
        write(temp.path(), "01. First/index.md");
        write(temp.path(), "01. First/a.md");

        let index = index(temp.path()).unwrap();
        let routes: Vec<_> = index.routes().map(|r| r.as_str()).collect();
        assert_eq!(routes, vec!["/", "/first", "/first/a", "/later/b"]);

        let unique: HashSet<_> = index.routes().collect();
        assert_eq!(unique.len(), index.len());
        for route in index.routes() {
            assert_eq!(&index.get(route.as_str()).unwrap().route, route);
        }
    }

    #[test]
    fn test_case_collision_names_both_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "A.md");
        write(temp.path(), "a.md");

        // Case-insensitive filesystems cannot hold both files
        if fs::read_dir(temp.path()).unwrap().count() < 2 {
            return;
        }

        match index(temp.path()).unwrap_err() {
            SiteError::RouteCollision { route, first, second } => {
                assert_eq!(route.as_str(), "/a");
                let names: HashSet<_> = [first, second]
                    .iter()
                    .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                    .collect();
                assert!(names.contains("A.md"));
                assert!(names.contains("a.md"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_file_and_folder_landing_page_collide() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "guide.md");
        write(temp.path(), "guide/index.md");

        assert!(matches!(
            index(temp.path()),
            Err(SiteError::RouteCollision { .. })
        ));
    }

    #[test]
    fn test_ordinal_variants_collide() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "1. Intro.md");
        write(temp.path(), "2. Intro.md");

        match index(temp.path()).unwrap_err() {
            SiteError::RouteCollision { route, .. } => assert_eq!(route.as_str(), "/intro"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_route_is_not_guessed() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "notes/closures.md");

        let index = index(temp.path()).unwrap();
        assert!(index.contains("/notes/closures"));
        assert!(index.get("/notes/closure").is_none());
        assert!(index.get("/notes/closures/").is_none());
        assert!(index.get("/notes").is_none());
    }
}
