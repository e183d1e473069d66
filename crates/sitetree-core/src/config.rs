use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteError};

/// Top-level configuration for a site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub content: ContentConfig,
}

/// Presentation-independent site metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    /// Title of the root navigation node; defaults to the root folder name
    #[serde(default)]
    pub title: Option<String>,
}

/// Where the notes live and which files count as notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root directory (relative paths resolve against the config file)
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Recognized note extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Normalized name of a folder's landing page
    #[serde(default = "default_index_name")]
    pub index_name: String,
    /// Entry names skipped during the walk (hidden entries are always skipped)
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default = "default_true")]
    pub follow_links: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

fn default_index_name() -> String {
    "index".to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["node_modules".to_string(), "target".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            index_name: default_index_name(),
            ignore: default_ignore(),
            follow_links: true,
        }
    }
}

impl SiteConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.content.root = root.into();
        config
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load a config file; a relative content root is resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SiteError::scan(path, e))?;
        let mut config =
            Self::from_yaml(&text).map_err(|e| SiteError::Config(format!("{}: {}", path.display(), e)))?;

        if config.content.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.content.root = base.join(&config.content.root);
        }
        Ok(config)
    }

    pub(crate) fn is_ignored(&self, name: &str) -> bool {
        name.starts_with('.') || self.content.ignore.iter().any(|ignored| ignored == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SiteConfig::from_yaml("site:\n  title: Notes\n").unwrap();
        assert_eq!(config.site.title.as_deref(), Some("Notes"));
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = SiteConfig::with_root("/srv/notes");
        config.content.extensions = vec!["md".to_string()];
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SiteConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_resolves_relative_root() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sitetree.yaml");
        std::fs::write(&path, "content:\n  root: notes\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.content.root, temp.path().join("notes"));
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sitetree.yaml");
        std::fs::write(&path, "content: [").unwrap();

        assert!(matches!(SiteConfig::load(&path), Err(SiteError::Config(_))));
    }

    #[test]
    fn test_hidden_and_ignored_names() {
        let config = SiteConfig::default();
        assert!(config.is_ignored(".git"));
        assert!(config.is_ignored("node_modules"));
        assert!(!config.is_ignored("guide"));
    }
}
