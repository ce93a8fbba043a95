use std::time::Duration;

/// Doubling retry delay for failed weather fetches.
#[derive(Debug, Clone)]
pub struct RetryBackoff {
    next: Duration,
    initial: Duration,
    ceiling: Duration,
}

impl Default for RetryBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(300))
    }
}

impl RetryBackoff {
    #[must_use]
    pub fn new(initial: Duration, ceiling: Duration) -> Self {
        Self {
            next: initial,
            initial,
            ceiling,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.ceiling);
        delay
    }

    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}
