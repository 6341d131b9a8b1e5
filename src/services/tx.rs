use tracing::warn;

use crate::repository::BlogTx;

use super::error::ServiceResult;

/// Commits when `result` is `Ok`, otherwise rolls back and hands the
/// original error back to the caller.
pub async fn finish<T>(tx: Box<dyn BlogTx>, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(error = %rollback_error, original = %e, "Rollback failed");
            }
            Err(e)
        }
    }
}
