use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Abstract interface for the read-only file system access a scan needs.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Immediate children of `dir`, sorted by file name.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<DirEntry>>;

    /// Whether any file with one of the given extensions exists under `root`.
    /// This should be a recursive search.
    fn contains_files(&self, root: &Path, extensions: &[String]) -> bool;

    /// Resolve `path` to the directory it really names, through any links.
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

/// Standard implementation of FileSystem using std::fs and walkdir.
pub struct PhysicalFileSystem {
    pub follow_links: bool,
}

impl Default for PhysicalFileSystem {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<DirEntry>> {
        // Surface a missing or unreadable root instead of an empty listing
        if !std::fs::metadata(dir)?.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "not a directory",
            ));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    debug!("skipping link loop under {}: {}", dir.display(), e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            entries.push(DirEntry {
                path: entry.path().to_path_buf(),
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: entry.file_type().is_dir(),
            });
        }

        Ok(entries)
    }

    fn contains_files(&self, root: &Path, extensions: &[String]) -> bool {
        WalkDir::new(root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(|e| e.ok())
            .any(|entry| entry.file_type().is_file() && has_extension(entry.path(), extensions))
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_is_sorted_and_shallow() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.md"), "b").unwrap();
        std::fs::write(temp.path().join("a.md"), "a").unwrap();
        std::fs::create_dir_all(temp.path().join("c/deep")).unwrap();
        std::fs::write(temp.path().join("c/deep/x.md"), "x").unwrap();

        let fs = PhysicalFileSystem::default();
        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "c"]);
        assert!(entries[2].is_dir);
    }

    #[test]
    fn test_read_dir_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::default();
        assert!(fs.read_dir(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_contains_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("empty/nested")).unwrap();
        std::fs::create_dir_all(temp.path().join("full/nested")).unwrap();
        std::fs::write(temp.path().join("full/nested/NOTE.MD"), "x").unwrap();

        let fs = PhysicalFileSystem::default();
        let exts = vec!["md".to_string()];
        assert!(!fs.contains_files(&temp.path().join("empty"), &exts));
        assert!(fs.contains_files(&temp.path().join("full"), &exts));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_dir_skips_link_to_itself() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.md"), "a").unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("again")).unwrap();

        let fs = PhysicalFileSystem::default();
        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.md"]);
    }

    #[test]
    fn test_canonicalize_resolves_parent_components() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("notes/sub")).unwrap();

        let fs = PhysicalFileSystem::default();
        let resolved = fs.canonicalize(&temp.path().join("notes/sub/..")).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "notes");
    }
}
