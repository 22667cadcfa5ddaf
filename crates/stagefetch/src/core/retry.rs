use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::data::RetryPolicy;
use crate::error::{FetchError, Result};

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Attempts are strictly sequential, with `sleep_between_attempts` between a
/// failure and the next try. A single-attempt policy never sleeps. When every
/// attempt fails the last error is kept inside
/// [`FetchError::RetryExhausted`].
///
/// The token is checked before each attempt and interrupts the sleep; a
/// running attempt is never interrupted.
pub async fn attempt<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                return Err(FetchError::RetryExhausted {
                    attempts: attempt,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                debug!(attempt, max_attempts, error = %e, "attempt failed, retrying");
                pause(policy.sleep_between_attempts(), cancel).await?;
                attempt += 1;
            }
        }
    }
}

/// Sleep for `duration` unless the token fires first.
pub(crate) async fn pause(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
