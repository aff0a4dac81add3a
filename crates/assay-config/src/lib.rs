//! # assay-config
//!
//! Layered configuration loading for assay using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ASSAY_*` prefix, `__` as separator)
//! 2. Project-level `.assay/config.toml`
//! 3. User-level `~/.config/assay/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `ASSAY_DATABASE__URL` -> `database.url`,
//! `ASSAY_REPOSITORY__ROOT` -> `repository.root`, etc.
//!
//! The question repository's own tag list is a separate YAML file loaded with
//! [`TagConfig::load`].

mod database;
mod error;
mod repository;
mod tags;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use repository::RepositoryConfig;
pub use tags::TagConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssayConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

impl AssayConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer holds a malformed value.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if any layer holds a malformed value.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".assay/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ASSAY_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("assay").join("config.toml"))
    }
}
