use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreshnessState {
    #[default]
    Fresh,
    Stale,
    Offline,
}

/// Bookkeeping for the weather refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct RefreshMetadata {
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub state: FreshnessState,
}

impl RefreshMetadata {
    pub fn mark_attempt(&mut self, at: DateTime<Utc>) {
        self.last_attempt = Some(at);
    }

    pub fn mark_success(&mut self, at: DateTime<Utc>) {
        self.last_success = Some(at);
        self.consecutive_failures = 0;
        self.state = FreshnessState::Fresh;
    }

    pub fn mark_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    pub fn reevaluate(&mut self, now: DateTime<Utc>, refresh_interval: Duration) {
        self.state = evaluate_freshness(
            now,
            self.last_success,
            self.consecutive_failures,
            refresh_interval,
        );
    }
}

/// Data older than one and a half refresh intervals is stale, older than
/// three is offline. Three failures in a row count as offline regardless.
#[must_use]
pub fn evaluate_freshness(
    now: DateTime<Utc>,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    refresh_interval: Duration,
) -> FreshnessState {
    if consecutive_failures >= 3 {
        return FreshnessState::Offline;
    }
    let Some(last_success) = last_success else {
        return FreshnessState::Stale;
    };

    let age = (now - last_success).to_std().unwrap_or_default();
    if age > refresh_interval.saturating_mul(3) {
        FreshnessState::Offline
    } else if age > refresh_interval.mul_f32(1.5) || consecutive_failures >= 1 {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    const INTERVAL: Duration = Duration::from_secs(600);

    fn ago(now: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
        Some(now - TimeDelta::minutes(minutes))
    }

    #[test]
    fn never_succeeded_is_stale_until_three_failures() {
        let now = Utc::now();
        assert_eq!(evaluate_freshness(now, None, 0, INTERVAL), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(now, None, 2, INTERVAL), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(now, None, 3, INTERVAL), FreshnessState::Offline);
    }

    #[test]
    fn age_thresholds_scale_with_the_interval() {
        let now = Utc::now();
        assert_eq!(evaluate_freshness(now, ago(now, 14), 0, INTERVAL), FreshnessState::Fresh);
        assert_eq!(evaluate_freshness(now, ago(now, 16), 0, INTERVAL), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(now, ago(now, 29), 0, INTERVAL), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(now, ago(now, 31), 0, INTERVAL), FreshnessState::Offline);

        let short = Duration::from_secs(60);
        assert_eq!(evaluate_freshness(now, ago(now, 2), 0, short), FreshnessState::Stale);
    }

    #[test]
    fn failures_degrade_recent_data() {
        let now = Utc::now();
        assert_eq!(evaluate_freshness(now, ago(now, 1), 1, INTERVAL), FreshnessState::Stale);
        assert_eq!(evaluate_freshness(now, ago(now, 1), 3, INTERVAL), FreshnessState::Offline);
    }

    #[test]
    fn success_resets_failures() {
        let now = Utc::now();
        let mut meta = RefreshMetadata::default();
        meta.mark_failure();
        meta.mark_failure();
        meta.reevaluate(now, INTERVAL);
        assert_eq!(meta.state, FreshnessState::Stale);

        meta.mark_success(now);
        assert_eq!(meta.consecutive_failures, 0);
        meta.reevaluate(now, INTERVAL);
        assert_eq!(meta.state, FreshnessState::Fresh);
    }
}
