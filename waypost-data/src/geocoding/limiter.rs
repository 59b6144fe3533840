//! Minimum spacing between outbound requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between consecutive requests from any caller.
///
/// The lock is held while waiting, so concurrent callers queue up and leave
/// one interval apart.
#[derive(Debug)]
pub struct RequestSpacing {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestSpacing {
    /// Create a limiter allowing one request per `min_interval`.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Configured minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request may be sent, then claim the slot.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let ready_at = previous + self.min_interval;
            if Instant::now() < ready_at {
                log::debug!("request spacing: waiting {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}
