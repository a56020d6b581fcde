use crate::domain::model::SessionContext;
use chrono::{DateTime, Local, TimeDelta};

pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 3;

/// Minimum interval between two submissions from the same session.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    min_interval: TimeDelta,
}

impl RateLimiter {
    pub fn new(min_interval_secs: u64) -> Self {
        Self {
            min_interval: TimeDelta::seconds(min_interval_secs as i64),
        }
    }

    /// Returns false when the session submitted too recently. Otherwise stamps
    /// the session with `now` and returns true.
    pub fn check_and_record(&self, session: &mut SessionContext, now: DateTime<Local>) -> bool {
        if let Some(last) = session.last_submission() {
            if now.signed_duration_since(last) < self.min_interval {
                return false;
            }
        }
        session.record_submission(now);
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_submission_passes_and_stamps() {
        let limiter = RateLimiter::default();
        let mut session = SessionContext::new("s1");
        let now = Local::now();

        assert!(limiter.check_and_record(&mut session, now));
        assert_eq!(session.last_submission(), Some(now));
    }

    #[test]
    fn test_repeat_within_interval_is_rejected() {
        let limiter = RateLimiter::default();
        let mut session = SessionContext::new("s1");
        let start = Local::now();

        assert!(limiter.check_and_record(&mut session, start));
        let retry = start + TimeDelta::milliseconds(2_999);
        assert!(!limiter.check_and_record(&mut session, retry));
        // 被拒絕時不更新時間戳
        assert_eq!(session.last_submission(), Some(start));
    }

    #[test]
    fn test_repeat_at_interval_passes() {
        let limiter = RateLimiter::default();
        let mut session = SessionContext::new("s1");
        let start = Local::now();

        assert!(limiter.check_and_record(&mut session, start));
        assert!(limiter.check_and_record(&mut session, start + TimeDelta::seconds(3)));
    }
}
