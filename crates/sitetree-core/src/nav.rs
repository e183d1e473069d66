use serde::Serialize;

use crate::model::{FolderNode, Node, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Document,
    Folder,
}

/// Display-oriented view of one tree entry.
///
/// Folders without an index document have no route: they only group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub title: String,
    pub route: Option<Route>,
    pub kind: NavKind,
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn is_navigable(&self) -> bool {
        self.route.is_some()
    }
}

/// One link in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub title: String,
    pub route: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree {
    pub root: NavNode,
}

impl NavTree {
    pub fn project(root: &FolderNode) -> Self {
        Self {
            root: project_folder(root),
        }
    }

    /// Navigable nodes in display order (pre-order).
    pub fn flatten(&self) -> Vec<&NavNode> {
        let mut out = Vec::new();
        walk(&self.root, &mut |node| {
            if node.is_navigable() {
                out.push(node);
            }
        });
        out
    }

    pub fn find(&self, route: &str) -> Option<&NavNode> {
        self.path_to(route).and_then(|path| path.last().copied())
    }

    /// Root-to-node trail for `route`, the node itself included.
    pub fn breadcrumbs(&self, route: &str) -> Vec<Crumb> {
        self.path_to(route)
            .unwrap_or_default()
            .into_iter()
            .map(|node| Crumb {
                title: node.title.clone(),
                route: node.route.clone(),
            })
            .collect()
    }

    /// Previous and next navigable pages around `route`.
    pub fn neighbors(&self, route: &str) -> (Option<&NavNode>, Option<&NavNode>) {
        let pages = self.flatten();
        let Some(pos) = pages
            .iter()
            .position(|node| node.route.as_ref().is_some_and(|r| r.as_str() == route))
        else {
            return (None, None);
        };

        let prev = pos.checked_sub(1).map(|i| pages[i]);
        let next = pages.get(pos + 1).copied();
        (prev, next)
    }

    fn path_to(&self, route: &str) -> Option<Vec<&NavNode>> {
        let mut path = Vec::new();
        if search(&self.root, route, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

fn project_folder(folder: &FolderNode) -> NavNode {
    NavNode {
        title: folder.title.clone(),
        route: folder.index.as_ref().map(|index| index.route.clone()),
        kind: NavKind::Folder,
        children: folder.children.iter().map(project_node).collect(),
    }
}

fn project_node(node: &Node) -> NavNode {
    match node {
        Node::File(file) => NavNode {
            title: file.title.clone(),
            route: Some(file.route.clone()),
            kind: NavKind::Document,
            children: Vec::new(),
        },
        Node::Folder(folder) => project_folder(folder),
    }
}

fn walk<'a>(node: &'a NavNode, visit: &mut impl FnMut(&'a NavNode)) {
    visit(node);
    for child in &node.children {
        walk(child, visit);
    }
}

fn search<'a>(node: &'a NavNode, route: &str, path: &mut Vec<&'a NavNode>) -> bool {
    path.push(node);
    if node.route.as_ref().is_some_and(|r| r.as_str() == route) {
        return true;
    }
    for child in &node.children {
        if search(child, route, path) {
            return true;
        }
    }
    path.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::tree::TreeBuilder;
    use crate::vfs::PhysicalFileSystem;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "text").unwrap();
    }

    fn nav(root: &Path) -> NavTree {
        let mut config = SiteConfig::with_root(root);
        config.site.title = Some("Notes".to_string());
        let tree = TreeBuilder::new(&config, &PhysicalFileSystem::default())
            .build()
            .unwrap();
        NavTree::project(&tree)
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "2. Intro.md");
        write(temp.path(), "1. Overview.md");
        write(temp.path(), "Appendix.md");
        write(temp.path(), "3. Guide/index.md");
        write(temp.path(), "3. Guide/setup.md");
        write(temp.path(), "4. Topics/closures.md");
        fs::create_dir_all(temp.path().join("5. Empty/inner")).unwrap();
        temp
    }

    #[test]
    fn test_projection_order_and_kinds() {
        let temp = fixture();
        let nav = nav(temp.path());

        assert_eq!(nav.root.title, "Notes");
        assert_eq!(nav.root.route, None);

        let titles: Vec<_> = nav.root.children.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Intro", "Guide", "Topics", "Appendix"]);

        let guide = &nav.root.children[2];
        assert_eq!(guide.kind, NavKind::Folder);
        assert_eq!(guide.route.as_ref().unwrap().as_str(), "/guide");
        assert_eq!(guide.children.len(), 1);

        let topics = &nav.root.children[3];
        assert!(!topics.is_navigable());
        assert_eq!(
            topics.children[0].route.as_ref().unwrap().as_str(),
            "/topics/closures"
        );
    }

    #[test]
    fn test_projection_is_repeatable() {
        let temp = fixture();
        let config = SiteConfig::with_root(temp.path());
        let tree = TreeBuilder::new(&config, &PhysicalFileSystem::default())
            .build()
            .unwrap();
        assert_eq!(NavTree::project(&tree), NavTree::project(&tree));
    }

    #[test]
    fn test_flatten_and_neighbors() {
        let temp = fixture();
        let nav = nav(temp.path());

        let routes: Vec<_> = nav
            .flatten()
            .iter()
            .map(|n| n.route.as_ref().unwrap().as_str())
            .collect();
        assert_eq!(
            routes,
            vec!["/overview", "/intro", "/guide", "/guide/setup", "/topics/closures", "/appendix"]
        );

        let (prev, next) = nav.neighbors("/guide/setup");
        assert_eq!(prev.unwrap().title, "Guide");
        assert_eq!(next.unwrap().title, "closures");

        let (prev, next) = nav.neighbors("/overview");
        assert!(prev.is_none());
        assert_eq!(next.unwrap().title, "Intro");

        assert_eq!(nav.neighbors("/missing"), (None, None));
    }

    #[test]
    fn test_breadcrumbs() {
        let temp = fixture();
        let nav = nav(temp.path());

        let crumbs = nav.breadcrumbs("/topics/closures");
        let titles: Vec<_> = crumbs.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Notes", "Topics", "closures"]);
        assert!(crumbs[1].route.is_none());

        assert!(nav.breadcrumbs("/missing").is_empty());
        assert_eq!(nav.find("/guide").unwrap().kind, NavKind::Folder);
    }
}
