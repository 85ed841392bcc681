//! Backoff schedule for connector calls that failed transiently.

use std::time::{Duration, SystemTime};

use reqwest_retry::{RetryDecision, RetryPolicy};

/// Doubling backoff with a retry budget.
///
/// `RetryTransientMiddleware` asks it only about transient outcomes (connection
/// errors, 5xx, 429). With a budget of zero the first failure is final, which is
/// what the execution engine client uses: its polling loop owns the retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    retries: u32,
    first_delay: Duration,
    ceiling: Duration,
}

impl Backoff {
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            first_delay: Duration::from_millis(500),
            ceiling: Duration::from_secs(8),
        }
    }

    /// Delay before the first retry. Each later retry waits twice as long.
    pub fn starting_at(mut self, first_delay: Duration) -> Self {
        self.first_delay = first_delay;
        self
    }

    /// Longest single wait between two attempts.
    pub fn capped_at(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Wait before retry number `past_retries + 1`.
    pub fn delay(&self, past_retries: u32) -> Duration {
        let factor = 1u32.checked_shl(past_retries).unwrap_or(u32::MAX);
        self.first_delay
            .checked_mul(factor)
            .map_or(self.ceiling, |delay| delay.min(self.ceiling))
    }

    /// Per-attempt timeout that lets every attempt and every wait between them
    /// fit inside `budget`. When the waits alone use up the budget, the budget
    /// is split evenly across the attempts.
    pub fn attempt_timeout(&self, budget: Duration) -> Duration {
        let attempts = self.retries.saturating_add(1);
        let waits: Duration = (0..self.retries).map(|n| self.delay(n)).sum();
        match budget.checked_sub(waits) {
            Some(remaining) if !remaining.is_zero() => remaining / attempts,
            _ => budget / attempts,
        }
    }
}

impl RetryPolicy for Backoff {
    fn should_retry(&self, _request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries >= self.retries {
            return RetryDecision::DoNotRetry;
        }
        RetryDecision::Retry {
            execute_after: SystemTime::now() + self.delay(n_past_retries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_until_ceiling() {
        let backoff = Backoff::new(5)
            .starting_at(Duration::from_secs(1))
            .capped_at(Duration::from_secs(5));

        let delays: Vec<u64> = (0..5).map(|n| backoff.delay(n).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);
    }

    #[test]
    fn test_large_retry_counts_saturate() {
        let backoff = Backoff::new(3);
        assert_eq!(backoff.delay(40), Duration::from_secs(8));
    }

    #[test]
    fn test_attempts_and_waits_fit_the_budget() {
        let budget = Duration::from_secs(10);
        for retries in 0..4 {
            let backoff = Backoff::new(retries);
            let waits: Duration = (0..retries).map(|n| backoff.delay(n)).sum();
            let total = backoff.attempt_timeout(budget) * (retries + 1) + waits;
            assert!(total <= budget, "{retries} retries take {total:?}");
        }
        assert_eq!(Backoff::new(0).attempt_timeout(budget), budget);
        assert_eq!(
            Backoff::new(1).attempt_timeout(budget),
            Duration::from_millis(4750)
        );
    }

    #[test]
    fn test_attempt_timeout_when_waits_exceed_budget() {
        let backoff = Backoff::new(3);
        assert_eq!(
            backoff.attempt_timeout(Duration::from_secs(1)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_zero_budget_never_retries() {
        assert!(matches!(
            Backoff::new(0).should_retry(SystemTime::now(), 0),
            RetryDecision::DoNotRetry
        ));
    }

    #[test]
    fn test_retries_until_budget_spent() {
        let backoff = Backoff::new(2);
        assert!(matches!(
            backoff.should_retry(SystemTime::now(), 1),
            RetryDecision::Retry { .. }
        ));
        assert!(matches!(
            backoff.should_retry(SystemTime::now(), 2),
            RetryDecision::DoNotRetry
        ));
    }
}
