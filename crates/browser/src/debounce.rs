//! Trailing-edge debounce.
//!
//! Collapses a burst of values into the last one, delivered once nothing new
//! has arrived for `delay`. Not tied to search: the driver uses it for search
//! edits, but any caller that owns the value stream can.

use std::future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Holds at most one pending value and the instant it becomes due.
#[derive(Debug)]
pub struct TrailingDebounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> TrailingDebounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `value`, replacing anything pending and restarting the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Drop the pending value, if any, and return it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves with the pending value once its quiet period has elapsed.
    ///
    /// Never resolves while nothing is pending, which makes it safe to poll
    /// from a `select!` loop. Dropping the future keeps the value queued.
    pub async fn fired(&mut self) -> T {
        let Some(deadline) = self.pending.as_ref().map(|(_, deadline)| *deadline) else {
            return future::pending().await;
        };

        sleep_until(deadline).await;

        match self.pending.take() {
            Some((value, _)) => value,
            None => future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let mut debounce = TrailingDebounce::new(Duration::from_millis(300));

        debounce.push("s");
        advance(Duration::from_millis(100)).await;
        debounce.push("st");
        advance(Duration::from_millis(100)).await;
        debounce.push("sta");
        let last_push = Instant::now();

        let value = debounce.fired().await;

        assert_eq!(value, "sta");
        assert_eq!(last_push.elapsed(), Duration::from_millis(300));
        assert!(!debounce.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_value_never_fires() {
        let mut debounce = TrailingDebounce::new(Duration::from_millis(300));

        debounce.push(1);
        assert_eq!(debounce.cancel(), Some(1));

        let result = timeout(Duration::from_secs(5), debounce.fired()).await;
        assert!(result.is_err(), "Nothing should fire after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_debounce_never_fires() {
        let mut debounce: TrailingDebounce<()> = TrailingDebounce::new(Duration::from_millis(10));

        let result = timeout(Duration::from_secs(1), debounce.fired()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_keeps_value_queued() {
        let mut debounce = TrailingDebounce::new(Duration::from_millis(300));
        debounce.push('x');

        // Give up waiting before the deadline
        let early = timeout(Duration::from_millis(100), debounce.fired()).await;
        assert!(early.is_err());
        assert!(debounce.is_pending());

        assert_eq!(debounce.fired().await, 'x');
    }
}
