use std::path::Path;

use anyhow::Context;
use assay_config::AssayConfig;

use crate::cli::GlobalFlags;

/// Load configuration, preferring the `.env` beside an explicit `--repo` over
/// the one in the current directory.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AssayConfig> {
    let config = if load_repo_dotenv(flags)? {
        AssayConfig::load()
    } else {
        AssayConfig::load_with_dotenv()
    };
    config.context("failed to load assay configuration")
}

/// Returns whether a `.env` was found in the `--repo` directory.
fn load_repo_dotenv(flags: &GlobalFlags) -> anyhow::Result<bool> {
    let Some(repo) = &flags.repo else {
        return Ok(false);
    };
    let env_path = Path::new(repo).join(".env");
    if !env_path.exists() {
        return Ok(false);
    }
    dotenvy::from_path(&env_path)
        .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    Ok(true)
}
