use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Root-level commands for the `assay` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Parse question files without writing anything
    Validate(ValidateArgs),
    /// Reconcile repository changes since the last upload
    Upload(UploadArgs),
    /// Relabel assessments of an amended commit
    Hash(HashArgs),
    /// Drop all stored assessments and rebuild them from the repository
    Reset(ResetArgs),
    /// Show the latest assessment of every tag
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Validate the whole repository by running the batch builder
    #[arg(long, conflicts_with = "files")]
    pub all: bool,

    /// Question files to validate
    #[arg(required_unless_present = "all")]
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct UploadArgs {
    /// Question files added since the last upload
    #[arg(long, num_args = 0.., value_name = "FILE")]
    pub added: Vec<PathBuf>,

    /// Question files deleted since the last upload
    #[arg(long, num_args = 0.., value_name = "FILE")]
    pub deleted: Vec<PathBuf>,

    /// Question files modified since the last upload
    #[arg(long, num_args = 0.., value_name = "FILE")]
    pub updated: Vec<PathBuf>,

    /// Reconcile the repository tag configuration as well
    #[arg(long)]
    pub config: bool,

    /// Commit hash recorded on every new assessment
    #[arg(long)]
    pub commit: String,

    /// Run the whole reconciliation, report it, then roll it back
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Args)]
pub struct HashArgs {
    /// Commit hash currently recorded on the latest assessments
    #[arg(long)]
    pub old_commit: String,

    /// Replacement commit hash
    #[arg(long)]
    pub new_commit: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResetArgs {
    /// Commit hash recorded on every rebuilt assessment
    #[arg(long)]
    pub commit: String,
}
