use std::path::PathBuf;

use anyhow::Context;
use assay_reconcile::{CommitReport, embed_new_ids, reset};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResetArgs;
use crate::commands::shared::rollback_after_error;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ResetResponse {
    commit: String,
    report: CommitReport,
    renamed: Vec<PathBuf>,
}

/// Handle `assay reset`.
pub async fn handle(args: &ResetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let mut gateway = db.begin().await.context("failed to start reset transaction")?;
    let report = match reset(&mut gateway, &ctx.parser, &ctx.repository, &args.commit).await {
        Ok(report) => report,
        Err(error) => {
            rollback_after_error(gateway).await;
            return Err(error).context("reset failed; stored assessments are unchanged");
        }
    };
    gateway.commit().await.context("failed to commit reset")?;

    let renamed = embed_new_ids(&ctx.repository, &report)
        .context("reset committed but renaming question files failed")?;

    output(
        &ResetResponse {
            commit: args.commit.clone(),
            report,
            renamed,
        },
        flags.format,
    )
}
