use anyhow::Context;
use assay_config::{AssayConfig, TagConfig};
use assay_db::AssayDb;
use assay_parser::{QuestionParser, QuestionRepository};

use crate::cli::GlobalFlags;

/// Resources shared by every command, built once per invocation.
pub struct AppContext {
    pub config: AssayConfig,
    pub parser: QuestionParser,
    pub repository: QuestionRepository,
}

impl AppContext {
    /// Resolve the repository root and load its tag configuration.
    ///
    /// `--repo` replaces `repository.root`; a relative `tag_config` follows it.
    pub fn init(mut config: AssayConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(repo) = &flags.repo {
            config.repository.root.clone_from(repo);
        }

        let root = config.repository.root_path();
        if !root.is_dir() {
            anyhow::bail!("question repository not found at {}", root.display());
        }

        let tag_config_path = config.repository.tag_config_path();
        let tags = TagConfig::load(&tag_config_path).with_context(|| {
            format!(
                "failed to load tag configuration from {}",
                tag_config_path.display()
            )
        })?;
        tracing::debug!(
            root = %root.display(),
            tags = tags.tags().count(),
            "loaded question repository"
        );

        let repository = QuestionRepository::new(root, config.repository.ignored_dirs.clone());
        Ok(Self {
            config,
            parser: QuestionParser::new(tags),
            repository,
        })
    }

    /// Open the configured database. Only commands that touch storage call this.
    pub async fn open_db(&self) -> anyhow::Result<AssayDb> {
        AssayDb::open(&self.config.database)
            .await
            .context("failed to open assay database")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::cli::OutputFormat;

    fn flags(repo: &str) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            repo: Some(repo.to_string()),
        }
    }

    #[test]
    fn repo_flag_overrides_root_and_tag_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "tagOptions: [backend]\n").unwrap();

        let ctx =
            AppContext::init(AssayConfig::default(), &flags(&dir.path().to_string_lossy())).unwrap();

        assert_eq!(ctx.repository.root(), dir.path());
        assert!(ctx.parser.tags().contains("backend"));
    }

    #[test]
    fn missing_tag_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let error =
            AppContext::init(AssayConfig::default(), &flags(&dir.path().to_string_lossy()))
                .err()
                .unwrap();
        assert!(error.to_string().contains("tag configuration"));
    }

    #[test]
    fn missing_repository_is_reported() {
        let error = AppContext::init(AssayConfig::default(), &flags("/definitely/not/here"))
            .err()
            .unwrap();
        assert!(error.to_string().contains("question repository not found"));
    }
}
