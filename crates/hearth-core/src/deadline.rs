//! Caller-supplied deadlines for collaborator calls.

use std::time::Duration;

use crate::error::{HearthError, HearthResult};

/// Run `fut` under `limit`. Expiry becomes [`HearthError::Timeout`]
/// naming `operation`; the future is dropped, never retried.
pub async fn within<T, F>(limit: Duration, operation: &str, fut: F) -> HearthResult<T>
where
    F: Future<Output = HearthResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "deadline exceeded");
            Err(HearthError::Timeout {
                operation: operation.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let ok = within(Duration::from_secs(1), "noop", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: HearthResult<()> = within(Duration::from_secs(1), "noop", async {
            Err(HearthError::conflict("taken"))
        })
        .await;
        assert!(matches!(err, Err(HearthError::Conflict { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let result: HearthResult<()> = within(Duration::from_millis(50), "store.get", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        match result {
            Err(HearthError::Timeout { operation }) => assert_eq!(operation, "store.get"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
