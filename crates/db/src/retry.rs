//! Bounded retry policy for transient read failures.
//!
//! Read queries may be retried a small bounded number of times with a
//! doubling backoff when the connection drops mid-flight. Write paths,
//! in particular the status-workflow transaction, must never be blindly
//! retried after partial-commit ambiguity; callers fail closed and let
//! the client re-issue the whole request.

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;

/// Retry policy for read queries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each subsequent retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Whether an error is a transient connection failure worth retrying.
    ///
    /// Record-level and query-level errors are never transient: retrying
    /// them would return the same failure.
    #[must_use]
    pub fn is_transient(err: &DbErr) -> bool {
        matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
    }

    /// Run a read operation, retrying transient failures.
    ///
    /// The closure is invoked once per attempt so each retry builds a
    /// fresh query against the pool.
    pub async fn run_read<T, F, Fut>(&self, mut op: F) -> Result<T, DbErr>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt: u32 = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && Self::is_transient(&err) => {
                    tracing::warn!(
                        error = %err,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Transient read failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> DbErr {
        DbErr::Conn(RuntimeErr::Internal("connection reset".into()))
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
        };

        let result = policy
            .run_read(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 { Err(transient()) } else { Ok(7_u32) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
        };

        let result: Result<u32, DbErr> = policy
            .run_read(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(transient()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_errors_fail_immediately() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<u32, DbErr> = policy
            .run_read(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(DbErr::Custom("constraint violation".into())) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_policy_is_single_attempt() {
        assert_eq!(RetryPolicy::disabled().max_attempts, 1);
    }
}
