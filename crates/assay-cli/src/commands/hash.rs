use anyhow::Context;
use assay_reconcile::relabel_commit;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HashArgs;
use crate::commands::shared::rollback_after_error;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct HashResponse {
    old_commit: String,
    new_commit: String,
    relabelled: u64,
}

/// Handle `assay hash`.
pub async fn handle(args: &HashArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let mut gateway = db.begin().await.context("failed to start transaction")?;
    let relabelled = match relabel_commit(&mut gateway, &args.old_commit, &args.new_commit).await {
        Ok(count) => count,
        Err(error) => {
            rollback_after_error(gateway).await;
            return Err(error).context("failed to relabel commit hash");
        }
    };
    gateway
        .commit()
        .await
        .context("failed to commit relabelled assessments")?;

    if relabelled == 0 {
        tracing::warn!(old_commit = %args.old_commit, "no latest assessment carries this commit hash");
    }

    output(
        &HashResponse {
            old_commit: args.old_commit.clone(),
            new_commit: args.new_commit.clone(),
            relabelled,
        },
        flags.format,
    )
}
