//! Question repository layout configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    ".".to_string()
}

fn default_tag_config() -> String {
    "config.yaml".to_string()
}

fn default_ignored_dirs() -> Vec<String> {
    vec!["uploader".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    /// Root of the question repository. Topic directories live directly below it.
    #[serde(default = "default_root")]
    pub root: String,

    /// Tag configuration file, relative to `root`.
    #[serde(default = "default_tag_config")]
    pub tag_config: String,

    /// Top-level directories that are not topics. Hidden directories are
    /// always skipped.
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            tag_config: default_tag_config(),
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl RepositoryConfig {
    #[must_use]
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// Tag configuration path resolved against `root`.
    #[must_use]
    pub fn tag_config_path(&self) -> PathBuf {
        let tag_config = Path::new(&self.tag_config);
        if tag_config.is_absolute() {
            tag_config.to_path_buf()
        } else {
            self.root_path().join(tag_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = RepositoryConfig::default();
        assert_eq!(config.root, ".");
        assert_eq!(config.tag_config_path(), PathBuf::from("./config.yaml"));
        assert_eq!(config.ignored_dirs, vec!["uploader".to_string()]);
    }

    #[test]
    fn absolute_tag_config_is_kept() {
        let config = RepositoryConfig {
            root: "/repo".into(),
            tag_config: "/etc/assay/tags.yaml".into(),
            ..Default::default()
        };
        assert_eq!(config.tag_config_path(), PathBuf::from("/etc/assay/tags.yaml"));
    }
}
