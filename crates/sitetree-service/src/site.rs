use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::sync::Arc;

use sitetree_core::{Crumb, FileNode, FrontMatter, NavTree, Route};

use crate::render::{PageSource, Renderer};
use crate::state::GlobalState;

/// A rendered document plus the navigation context around it.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub route: Route,
    pub title: String,
    pub html: String,
    pub front_matter: Option<FrontMatter>,
    pub breadcrumbs: Vec<Crumb>,
    pub prev: Option<Crumb>,
    pub next: Option<Crumb>,
}

/// Read side for a page-serving layer.
///
/// Every call works on whichever snapshot is current when it starts, so a
/// page and its navigation always come from the same scan.
#[derive(Clone)]
pub struct Site {
    state: GlobalState,
    renderer: Arc<dyn Renderer>,
}

impl Site {
    pub fn new(state: GlobalState, renderer: Arc<dyn Renderer>) -> Self {
        Self { state, renderer }
    }

    pub async fn page(&self, request_path: &str) -> Option<Arc<FileNode>> {
        let snapshot = self.state.current().await?;
        snapshot.get(&canonical_request_path(request_path)).cloned()
    }

    pub async fn nav(&self) -> Option<NavTree> {
        let snapshot = self.state.current().await?;
        Some(snapshot.nav().clone())
    }

    pub async fn render(&self, request_path: &str) -> Option<RenderedPage> {
        let snapshot = self.state.current().await?;
        let route = canonical_request_path(request_path);
        let file = snapshot.get(&route)?;

        let html = self.renderer.render(&PageSource::from(file.as_ref()));
        let nav = snapshot.nav();
        let (prev, next) = nav.neighbors(&route);
        let to_crumb = |node: &sitetree_core::NavNode| Crumb {
            title: node.title.clone(),
            route: node.route.clone(),
        };

        Some(RenderedPage {
            route: file.route.clone(),
            title: file.title.clone(),
            html,
            front_matter: file.front_matter.clone(),
            breadcrumbs: nav.breadcrumbs(&route),
            prev: prev.map(to_crumb),
            next: next.map(to_crumb),
        })
    }
}

/// Map an incoming request path onto route syntax.
///
/// Decodes percent escapes, drops a trailing `.html`, `/index` or `/`, and
/// guarantees a leading `/`. No fuzzy matching happens beyond that.
pub fn canonical_request_path(request_path: &str) -> String {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    let mut path = decoded.trim().to_string();

    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if let Some(stripped) = path.strip_suffix(".html") {
        path = stripped.to_string();
    }
    if path == "/index" {
        return "/".to_string();
    }
    if let Some(stripped) = path.strip_suffix("/index") {
        path = stripped.to_string();
    }
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_request_path() {
        assert_eq!(canonical_request_path("/"), "/");
        assert_eq!(canonical_request_path(""), "/");
        assert_eq!(canonical_request_path("/index.html"), "/");
        assert_eq!(canonical_request_path("docs/guide/"), "/docs/guide");
        assert_eq!(canonical_request_path("/docs/guide/index"), "/docs/guide");
        assert_eq!(canonical_request_path("/docs/guide/setup.html"), "/docs/guide/setup");
        assert_eq!(canonical_request_path("/%E4%BD%A0%E5%A5%BD-world"), "/你好-world");
    }
}
