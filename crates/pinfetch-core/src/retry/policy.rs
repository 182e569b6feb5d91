use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read, or HTTP 408).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server error (5xx other than 503).
    Http5xx(u16),
    /// Client error (4xx other than 408/429); unlikely to change on retry.
    Client(u16),
    /// Local write failure.
    Storage,
    /// Anything else.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// `delay * 2^(attempt-1)`, capped at `max_delay`.
    Exponential { max_delay: Duration },
}

/// Bounded retry policy.
///
/// The default retries every failure kind: three attempts in total, two seconds
/// apart. Set `retry_client_errors` to `false` to stop at the first 4xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub delay: Duration,
    pub backoff: Backoff,
    /// Whether 4xx responses (other than 408/429) are retried.
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            backoff: Backoff::Fixed,
            retry_client_errors: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never sleeps; for tests and local sources.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Decide whether to retry after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        if matches!(kind, ErrorKind::Client(_)) && !self.retry_client_errors {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_after(attempt))
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { max_delay } => {
                let exp = 1u32 << attempt.saturating_sub(1).min(16);
                self.delay.saturating_mul(exp).min(max_delay)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_attempts_two_seconds_fixed() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(
            p.decide(1, ErrorKind::Http5xx(500)),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            p.decide(2, ErrorKind::Connection),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(p.decide(3, ErrorKind::Connection), RetryDecision::NoRetry);
    }

    #[test]
    fn default_retries_every_kind() {
        let p = RetryPolicy::default();
        for kind in [
            ErrorKind::Timeout,
            ErrorKind::Throttled,
            ErrorKind::Connection,
            ErrorKind::Http5xx(502),
            ErrorKind::Client(404),
            ErrorKind::Storage,
            ErrorKind::Other,
        ] {
            assert!(matches!(p.decide(1, kind), RetryDecision::RetryAfter(_)), "{kind:?}");
        }
    }

    #[test]
    fn client_errors_can_short_circuit() {
        let p = RetryPolicy {
            retry_client_errors: false,
            ..RetryPolicy::default()
        };
        assert_eq!(p.decide(1, ErrorKind::Client(404)), RetryDecision::NoRetry);
        assert!(matches!(
            p.decide(1, ErrorKind::Throttled),
            RetryDecision::RetryAfter(_)
        ));
    }

    #[test]
    fn exponential_backoff_grows_and_is_capped() {
        let p = RetryPolicy {
            max_attempts: 20,
            delay: Duration::from_millis(250),
            backoff: Backoff::Exponential {
                max_delay: Duration::from_secs(5),
            },
            retry_client_errors: true,
        };
        let d = |a| match p.decide(a, ErrorKind::Timeout) {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry"),
        };
        assert_eq!(d(1), Duration::from_millis(250));
        assert_eq!(d(2), Duration::from_millis(500));
        assert_eq!(d(3), Duration::from_secs(1));
        assert_eq!(d(15), Duration::from_secs(5));
    }

    #[test]
    fn single_attempt_never_retries() {
        let p = RetryPolicy::immediate(1);
        assert_eq!(p.decide(1, ErrorKind::Timeout), RetryDecision::NoRetry);
    }
}
