use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `assay` binary.
#[derive(Debug, Parser)]
#[command(
    name = "assay",
    version,
    about = "assay - keep assessments in sync with a question repository"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Question repository root (overrides `repository.root`)
    #[arg(short, long, global = true)]
    pub repo: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            repo: self.repo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["assay", "--format", "raw", "--verbose", "status"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["assay", "status", "--quiet", "--repo", "/tmp/questions"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.repo.as_deref(), Some("/tmp/questions"));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["assay", "--format", "table", "status"]).is_err());
    }

    #[test]
    fn upload_collects_file_lists() {
        let cli = Cli::try_parse_from([
            "assay",
            "upload",
            "--added",
            "Databases/joins.md",
            "Databases/indexes.md",
            "--deleted",
            "Networking/tcp_qid4.md",
            "--config",
            "--commit",
            "abc123",
        ])
        .expect("cli should parse");

        let Commands::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(
            args.added,
            vec![
                PathBuf::from("Databases/joins.md"),
                PathBuf::from("Databases/indexes.md")
            ]
        );
        assert_eq!(args.deleted, vec![PathBuf::from("Networking/tcp_qid4.md")]);
        assert!(args.updated.is_empty());
        assert!(args.config);
        assert!(!args.dry_run);
        assert_eq!(args.commit, "abc123");
    }

    #[test]
    fn upload_accepts_empty_file_lists() {
        let cli = Cli::try_parse_from([
            "assay", "upload", "--added", "--updated", "--commit", "abc123",
        ])
        .expect("cli should parse");

        let Commands::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert!(args.added.is_empty());
        assert!(args.updated.is_empty());
    }

    #[test]
    fn upload_requires_commit() {
        assert!(Cli::try_parse_from(["assay", "upload", "--added", "a/b.md"]).is_err());
    }

    #[test]
    fn validate_needs_files_or_all() {
        assert!(Cli::try_parse_from(["assay", "validate"]).is_err());
        assert!(Cli::try_parse_from(["assay", "validate", "--all", "a/b.md"]).is_err());

        let cli = Cli::try_parse_from(["assay", "validate", "--all"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Validate(args) if args.all));
    }

    #[test]
    fn hash_takes_both_commits() {
        let cli = Cli::try_parse_from([
            "assay",
            "hash",
            "--old-commit",
            "abc123",
            "--new-commit",
            "def456",
        ])
        .expect("cli should parse");

        let Commands::Hash(args) = cli.command else {
            panic!("expected hash");
        };
        assert_eq!(args.old_commit, "abc123");
        assert_eq!(args.new_commit, "def456");
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["assay", "--repo", "/tmp/demo", "reset", "--commit", "c1"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.repo.as_deref(), Some("/tmp/demo"));
        assert_eq!(flags.format, OutputFormat::Json);
    }
}
