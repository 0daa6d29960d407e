//! Linear-backoff reconnection with a fixed attempt ceiling.
//!
//! When the live connection drops, the session loop calls
//! [`reconnect_loop`] to retry with delays growing linearly per attempt.
//! After the last allowed attempt fails the loop gives up for good —
//! the console then shows a persistent "connection lost" indicator and
//! never retries on its own.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Tunable parameters for the retry strategy.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay multiplier: attempt `n` waits `n * base_delay`.
    pub base_delay: Duration,
    /// Total attempts before giving up.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given 1-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Why [`reconnect_loop`] stopped without a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectFailure {
    /// Every allowed attempt failed; the caller must treat the
    /// connection as permanently lost.
    AttemptsExhausted,
    /// The cancellation token fired.
    Cancelled,
}

/// Retry `connect` until it succeeds, the policy's attempt ceiling is
/// reached, or `cancel` fires.
///
/// The delay before attempt `n` is `n * base_delay`. `connect` receives
/// the attempt number for logging.
pub async fn reconnect_loop<T, E, F, Fut>(
    mut connect: F,
    policy: &ReconnectPolicy,
    cancel: &CancellationToken,
) -> Result<T, ReconnectFailure>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for attempt in 1..=policy.max_attempts {
        let delay = policy.delay_for(attempt);
        tracing::info!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Scheduling reconnection attempt",
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(ReconnectFailure::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(ReconnectFailure::Cancelled),
            result = connect(attempt) => {
                match result {
                    Ok(conn) => {
                        tracing::info!(attempt, "Reconnected");
                        return Ok(conn);
                    }
                    Err(e) => {
                        tracing::warn!(attempt, error = %e, "Reconnection attempt failed");
                    }
                }
            }
        }
    }

    tracing::error!(
        max_attempts = policy.max_attempts,
        "Giving up on reconnection",
    );
    Err(ReconnectFailure::AttemptsExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::Cell;

    #[test]
    fn delays_grow_linearly() {
        let policy = ReconnectPolicy::default();
        let delays: Vec<u64> = (1..=5).map(|n| policy.delay_for(n).as_secs()).collect();
        assert_eq!(delays, vec![2, 4, 6, 8, 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_last_attempt() {
        let policy = ReconnectPolicy::default();
        let cancel = CancellationToken::new();
        let attempts = Cell::new(0u32);

        let result: Result<(), _> = reconnect_loop(
            |attempt| {
                attempts.set(attempt);
                async { Err::<(), _>("refused") }
            },
            &policy,
            &cancel,
        )
        .await;

        assert_matches!(result, Err(ReconnectFailure::AttemptsExhausted));
        assert_eq!(attempts.get(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_connection_on_first_success() {
        let policy = ReconnectPolicy::default();
        let cancel = CancellationToken::new();

        let result = reconnect_loop(
            |attempt| async move {
                if attempt < 3 {
                    Err("refused")
                } else {
                    Ok(attempt)
                }
            },
            &policy,
            &cancel,
        )
        .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_wait() {
        let policy = ReconnectPolicy {
            base_delay: Duration::from_secs(60),
            max_attempts: 5,
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<(), _> =
            reconnect_loop(|_| async { Err::<(), _>("refused") }, &policy, &cancel).await;

        assert_matches!(result, Err(ReconnectFailure::Cancelled));
    }
}
