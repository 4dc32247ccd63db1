use rand::Rng;
use std::time::Duration;

/// Backoff policy for transient storage failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(200),
            jitter_max: Some(Duration::from_millis(25)),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based), without jitter
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Runs `f` until it succeeds or `max_attempts` calls have failed, returning
/// the last error.
pub async fn retry_async_with_config<F, Fut, T, E>(config: RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0u32;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                retry += 1;
                if retry as usize >= config.max_attempts {
                    return Err(e);
                }

                let jitter = config
                    .jitter_max
                    .map(|max| {
                        let max_ms = max.as_millis() as u64;
                        Duration::from_millis(rand::rng().random_range(0..=max_ms))
                    })
                    .unwrap_or_default();
                let wait = config.backoff_for(retry) + jitter;

                tracing::debug!("Transient failure ({}), retrying in {:?}", e, wait);
                tokio::time::sleep(wait).await;
            }
        }
    }
}
