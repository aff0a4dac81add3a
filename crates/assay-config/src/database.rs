//! libSQL connection configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "assay.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. Used whenever the remote pair is incomplete.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://assessments.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether both remote fields are set.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "assay.db");
        assert!(!config.is_remote());
    }

    #[test]
    fn url_without_token_stays_local() {
        let config = DatabaseConfig {
            url: "libsql://assessments.turso.io".into(),
            ..Default::default()
        };
        assert!(!config.is_remote());
    }

    #[test]
    fn remote_when_url_and_token_set() {
        let config = DatabaseConfig {
            url: "libsql://assessments.turso.io".into(),
            auth_token: "token".into(),
            ..Default::default()
        };
        assert!(config.is_remote());
    }
}
