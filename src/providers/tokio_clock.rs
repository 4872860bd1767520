//! Tokio-based clock implementation.

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::traits::Clock;

/// Production clock implementation using Tokio's time functions.
///
/// Unix time comes from the system clock via [`Clock::unix_now`]'s default.
///
/// # Examples
///
/// ```rust
/// use offsetzap_rs::providers::TokioClock;
///
/// let clock = TokioClock::new();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TokioClock;

impl TokioClock {
    /// Creates a new Tokio clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_advances_tokio_time() {
        let clock = TokioClock::new();
        let start = tokio::time::Instant::now();

        clock.sleep(Duration::from_secs(30)).await;

        assert!(tokio::time::Instant::now() - start >= Duration::from_secs(30));
        assert!(clock.unix_now() > 1_600_000_000);
    }
}
