use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Flat front-matter pairs, passed through to the renderer untouched.
pub type FrontMatter = BTreeMap<String, String>;

/// Canonical URL path of one document.
///
/// Always starts with `/`. Only the root route ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn root() -> Self {
        Route("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Append one normalized segment.
    pub fn join(&self, segment: &str) -> Route {
        if self.is_root() {
            Route(format!("/{}", segment))
        } else {
            Route(format!("{}/{}", self.0, segment))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segments from the root, excluding the empty root segment.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Route {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One Markdown file. Never mutated after the builder creates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileNode {
    pub path: PathBuf,
    pub title: String,
    pub route_segment: String,
    pub route: Route,
    pub ordinal: Option<u32>,
    pub front_matter: Option<FrontMatter>,
    #[serde(skip)]
    pub raw_text: String,
    /// Byte offset where the body starts, past any front-matter block
    #[serde(skip)]
    pub body_offset: usize,
    pub digest: String,
}

impl FileNode {
    /// Text after the front-matter block.
    pub fn body(&self) -> &str {
        self.raw_text.get(self.body_offset..).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub path: PathBuf,
    pub title: String,
    pub route_segment: String,
    /// The route this folder's landing page would own
    pub route: Route,
    pub ordinal: Option<u32>,
    pub index: Option<Arc<FileNode>>,
    pub children: Vec<Node>,
}

impl FolderNode {
    pub fn is_navigable(&self) -> bool {
        self.index.is_some()
    }

    /// Every document in this subtree, index documents first, in sibling order.
    pub fn documents(&self) -> Vec<&Arc<FileNode>> {
        let mut out = Vec::new();
        collect_documents(self, &mut out);
        out
    }
}

fn collect_documents<'a>(folder: &'a FolderNode, out: &mut Vec<&'a Arc<FileNode>>) {
    if let Some(index) = &folder.index {
        out.push(index);
    }
    for child in &folder.children {
        match child {
            Node::File(file) => out.push(file),
            Node::Folder(sub) => collect_documents(sub, out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    File(Arc<FileNode>),
    Folder(FolderNode),
}

impl Node {
    pub fn title(&self) -> &str {
        match self {
            Node::File(file) => &file.title,
            Node::Folder(folder) => &folder.title,
        }
    }

    pub fn route_segment(&self) -> &str {
        match self {
            Node::File(file) => &file.route_segment,
            Node::Folder(folder) => &folder.route_segment,
        }
    }

    pub fn ordinal(&self) -> Option<u32> {
        match self {
            Node::File(file) => file.ordinal,
            Node::Folder(folder) => folder.ordinal,
        }
    }
}
