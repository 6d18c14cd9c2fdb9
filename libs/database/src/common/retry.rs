use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded exponential backoff for start-up connection attempts
///
/// Delays double from `initial_delay` up to `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Scale each delay to a random 50-100% of its value
    pub jitter: bool,
}

impl Default for RetryConfig {
    /// Five retries from 250ms, capped at 5s: roughly the time a database
    /// started next to the service needs to accept connections.
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// The un-jittered wait before each retry, in order.
    fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay), |d| Some(d.saturating_mul(2)))
            .map(|d| d.min(self.max_delay))
            .take(self.max_retries as usize)
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries are spent.
///
/// The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delays = config.delays();
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempts = attempt, "Connected after retrying");
                }
                return Ok(result);
            }
            Err(err) => err,
        };

        let Some(delay) = delays.next() else {
            warn!(attempts = attempt, error = %err, "Giving up");
            return Err(err);
        };
        let wait = if config.jitter { apply_jitter(delay) } else { delay };

        warn!(
            attempt,
            max_retries = config.max_retries,
            error = %err,
            "Attempt failed, retrying in {:?}",
            wait
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

/// 50% to 100% of `delay`
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay.mul_f64(percent as f64 / 100.0)
}
