use assay_db::SqlGateway;

/// Roll back a failed run. The original error is what the caller reports, so
/// a rollback failure is only logged.
pub async fn rollback_after_error(gateway: SqlGateway) {
    if let Err(error) = gateway.rollback().await {
        tracing::warn!(%error, "failed to roll back transaction");
    }
}
