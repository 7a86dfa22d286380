//! Debouncing of rapidly changing input.

use std::time::Duration;

use tokio::time::Instant;

/// Holds the latest pushed value until no new value has arrived for `delay`.
///
/// Each push restarts the window. Time comes from `tokio::time`, so tests can
/// pause and advance the clock.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounced<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the window.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending value, if its window has elapsed.
    pub fn take_ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Wait out the window and return the pending value.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.pending.as_ref()?.1;
        tokio::time::sleep_until(deadline).await;
        self.pending.take().map(|(value, _)| value)
    }
}
