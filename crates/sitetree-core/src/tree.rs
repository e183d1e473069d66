use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::frontmatter;
use crate::model::{FileNode, FolderNode, Node, Route};
use crate::normalize::{normalize_segment, order, Segment, SegmentKind};
use crate::vfs::{has_extension, DirEntry, FileSystem};

/// Walks the content root and mirrors it as an ordered tree.
///
/// All or nothing: the first unreadable entry, bad name or duplicate index
/// aborts the whole build.
pub struct TreeBuilder<'a> {
    config: &'a SiteConfig,
    fs: &'a dyn FileSystem,
    /// `content.index_name` under the same slug rules as file names
    index_segment: String,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a SiteConfig, fs: &'a dyn FileSystem) -> Self {
        let index_name = &config.content.index_name;
        let index_segment = normalize_segment(index_name, SegmentKind::Folder)
            .map(|segment| segment.route_segment)
            .unwrap_or_else(|_| index_name.to_lowercase());

        Self {
            config,
            fs,
            index_segment,
        }
    }

    pub fn build(&self) -> Result<FolderNode> {
        let root = &self.config.content.root;
        // A missing root is reported by the listing below
        let real_root = self.fs.canonicalize(root).unwrap_or_else(|_| root.clone());
        let title = self
            .config
            .site
            .title
            .clone()
            .unwrap_or_else(|| root_title(&real_root));

        let mut ancestors = vec![real_root];
        let (index, children) = self.build_children(root, &Route::root(), &mut ancestors)?;

        Ok(FolderNode {
            path: root.clone(),
            title,
            route_segment: String::new(),
            route: Route::root(),
            ordinal: None,
            index,
            children,
        })
    }

    /// Returns `None` when the folder holds no notes anywhere below it, or
    /// when it links back to one of the folders being walked.
    fn build_folder(
        &self,
        entry: &DirEntry,
        segment: Segment,
        route: Route,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<Option<FolderNode>> {
        let real = self
            .fs
            .canonicalize(&entry.path)
            .map_err(|e| SiteError::scan(&entry.path, e))?;
        if ancestors.contains(&real) {
            debug!("skipping {}, it loops back to {}", entry.path.display(), real.display());
            return Ok(None);
        }

        ancestors.push(real);
        let built = self.build_children(&entry.path, &route, ancestors);
        ancestors.pop();
        let (index, children) = built?;

        if index.is_none() && children.is_empty() {
            debug!("pruning empty folder {}", entry.path.display());
            return Ok(None);
        }

        Ok(Some(FolderNode {
            path: entry.path.clone(),
            title: segment.title,
            route_segment: segment.route_segment,
            route,
            ordinal: segment.ordinal,
            index,
            children,
        }))
    }

    fn build_children(
        &self,
        dir: &Path,
        route: &Route,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(Option<Arc<FileNode>>, Vec<Node>)> {
        let entries = self
            .fs
            .read_dir(dir)
            .map_err(|e| SiteError::scan(dir, e))?;

        let mut index: Option<Arc<FileNode>> = None;
        let mut children: Vec<(String, Node)> = Vec::new();

        for entry in entries {
            if self.config.is_ignored(&entry.name) {
                continue;
            }

            if entry.is_dir {
                let segment = match normalize_segment(&entry.name, SegmentKind::Folder) {
                    Ok(segment) => segment,
                    Err(_) if !self.fs.contains_files(&entry.path, &self.config.content.extensions) => {
                        continue;
                    }
                    Err(e) => return Err(e.at_path(&entry.path)),
                };
                let child_route = route.join(&segment.route_segment);
                if let Some(folder) = self.build_folder(&entry, segment, child_route, ancestors)? {
                    children.push((entry.name, Node::Folder(folder)));
                }
                continue;
            }

            if !has_extension(&entry.path, &self.config.content.extensions) {
                continue;
            }

            let segment =
                normalize_segment(&entry.name, SegmentKind::File).map_err(|e| e.at_path(&entry.path))?;

            if segment.route_segment == self.index_segment {
                let file = self.read_file(&entry.path, segment, route.clone())?;
                if let Some(existing) = &index {
                    return Err(SiteError::RouteCollision {
                        route: route.clone(),
                        first: existing.path.clone(),
                        second: file.path.clone(),
                    });
                }
                index = Some(Arc::new(file));
            } else {
                let child_route = route.join(&segment.route_segment);
                let file = self.read_file(&entry.path, segment, child_route)?;
                children.push((entry.name, Node::File(Arc::new(file))));
            }
        }

        // Raw names only break ties between identical normalized keys
        children.sort_by(|(a_name, a), (b_name, b)| {
            order(a.ordinal(), a.route_segment(), b.ordinal(), b.route_segment())
                .then_with(|| a_name.cmp(b_name))
        });

        Ok((index, children.into_iter().map(|(_, node)| node).collect()))
    }

    fn read_file(&self, path: &Path, segment: Segment, route: Route) -> Result<FileNode> {
        let raw_text = self
            .fs
            .read_to_string(path)
            .map_err(|e| SiteError::scan(path, e))?;
        let extracted = frontmatter::extract(&raw_text);

        debug!("{} -> {}", path.display(), route);

        Ok(FileNode {
            path: path.to_path_buf(),
            title: segment.title,
            route_segment: segment.route_segment,
            route,
            ordinal: segment.ordinal,
            front_matter: extracted.front_matter,
            raw_text,
            body_offset: extracted.body_offset,
            digest: extracted.digest,
        })
    }
}

fn root_title(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "/".to_string())
}
