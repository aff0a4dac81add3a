use std::path::PathBuf;

use anyhow::Context;
use assay_reconcile::{CommitReport, UploadRequest, embed_new_ids, run_upload};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UploadArgs;
use crate::commands::shared::rollback_after_error;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct UploadResponse {
    commit: String,
    skipped: bool,
    dry_run: bool,
    report: CommitReport,
    renamed: Vec<PathBuf>,
}

/// Handle `assay upload`.
pub async fn handle(args: &UploadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = upload_request(args).markdown_only();
    if request.is_noop() {
        tracing::info!("no question files changed; nothing to upload");
        return output(
            &UploadResponse {
                commit: args.commit.clone(),
                skipped: true,
                dry_run: args.dry_run,
                report: CommitReport::default(),
                renamed: Vec::new(),
            },
            flags.format,
        );
    }

    let db = ctx.open_db().await?;
    let mut gateway = db.begin().await.context("failed to start upload transaction")?;
    let outcome = match run_upload(&mut gateway, &ctx.parser, &ctx.repository, request).await {
        Ok(outcome) => outcome,
        Err(error) => {
            rollback_after_error(gateway).await;
            return Err(error).context("upload failed; no changes were written");
        }
    };

    let renamed = if args.dry_run {
        gateway
            .rollback()
            .await
            .context("failed to roll back dry run")?;
        tracing::info!(commit = %args.commit, "dry run rolled back");
        Vec::new()
    } else {
        gateway
            .commit()
            .await
            .context("failed to commit upload")?;
        embed_new_ids(&ctx.repository, &outcome.report)
            .context("upload committed but renaming new question files failed")?
    };

    output(
        &UploadResponse {
            commit: args.commit.clone(),
            skipped: outcome.skipped,
            dry_run: args.dry_run,
            report: outcome.report,
            renamed,
        },
        flags.format,
    )
}

fn upload_request(args: &UploadArgs) -> UploadRequest {
    UploadRequest {
        added: args.added.clone(),
        deleted: args.deleted.clone(),
        modified: args.updated.clone(),
        reconcile_config: args.config,
        commit_hash: args.commit.clone(),
    }
}
