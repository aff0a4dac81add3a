//! Tag configuration owned by the question repository.
//!
//! The repository declares the tags a question may carry in a YAML file:
//!
//! ```yaml
//! tagOptions:
//!   - Backend Developer
//!   - Frontend Developer
//! ```

use std::collections::HashSet;
use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TagConfig {
    #[serde(rename = "tagOptions")]
    pub tag_options: Vec<String>,
}

impl TagConfig {
    /// Build a validated config from an explicit tag list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for blank or duplicate tags.
    pub fn new<I, S>(tags: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = Self {
            tag_options: tags.into_iter().map(Into::into).collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the tag file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the file is missing,
    /// `ConfigError::Figment` if it does not contain a `tagOptions` list, and
    /// `ConfigError::InvalidValue` for blank or duplicate tags.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let config: Self = Figment::from(Yaml::file(path)).extract()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tag_options.iter().any(|option| option == tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag_options.iter().map(String::as_str)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for tag in &self.tag_options {
            if tag.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "tagOptions".into(),
                    reason: "tags must not be blank".into(),
                });
            }
            if !seen.insert(tag.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "tagOptions".into(),
                    reason: format!("tag '{tag}' is listed more than once"),
                });
            }
        }
        Ok(())
    }
}
