//! Retry policy for the call layer.
//!
//! A [`RetryPolicy`] pairs a [`RetryStrategy`] (how long to wait, and for how
//! long to keep trying) with a [`RetryPredicate`] (which failures are worth
//! another attempt). The client picks one policy at construction time and
//! runs every API call through it.

use crate::{config::SwcConfig, Error};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the first retry when backoff is enabled.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on a single backoff delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Defines when and how long to wait between attempts.
///
/// # Examples
///
/// ```
/// use swc_sdk::RetryStrategy;
/// use std::time::Duration;
///
/// // No retries
/// let no_retry = RetryStrategy::None;
///
/// // 1s, 2s, 4s, ... with jitter, giving up once 30s have passed
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_secs(1),
///     max_delay: Duration::from_secs(60),
///     max_elapsed: Duration::from_secs(30),
///     jitter: true,
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryStrategy {
    /// Do not retry failed requests.
    #[default]
    None,

    /// Retry with exponentially increasing delays until a time budget runs out.
    ///
    /// Each retry waits for `initial_delay * 2^(attempt - 1)` (capped at
    /// `max_delay`). The wait never extends past `max_elapsed` measured from
    /// the first attempt.
    ExponentialBackoff {
        /// The delay before the first retry.
        initial_delay: Duration,
        /// The maximum delay between two attempts.
        max_delay: Duration,
        /// Total time budget across all attempts and delays.
        max_elapsed: Duration,
        /// Whether to randomize each delay.
        jitter: bool,
    },
}

impl RetryStrategy {
    /// Exponential backoff with jitter, default delays and the given time budget.
    pub fn exponential(max_elapsed: Duration) -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_elapsed,
            jitter: true,
        }
    }

    /// Returns the delay before the given retry, or `None` once retries are exhausted.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The retry number (1-indexed, so 1 = first retry)
    /// * `elapsed` - Time spent since the first attempt started
    pub fn delay_for_attempt(&self, attempt: usize, elapsed: Duration) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_elapsed,
                jitter,
            } => {
                let remaining = max_elapsed.checked_sub(elapsed)?;
                if remaining.is_zero() {
                    return None;
                }

                let multiplier = 2u64.saturating_pow(attempt.saturating_sub(1) as u32);
                let base_delay =
                    initial_delay.saturating_mul(multiplier.try_into().unwrap_or(u32::MAX));
                let mut delay = base_delay.min(*max_delay);

                if *jitter {
                    // Between 50% and 100% of the computed delay
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    delay = delay.mul_f64(jitter_factor);
                }

                Some(delay.min(remaining))
            }
        }
    }

    /// Returns the total time budget, if this strategy retries at all.
    pub fn max_elapsed(&self) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff { max_elapsed, .. } => Some(*max_elapsed),
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// # Examples
///
/// ```
/// use swc_sdk::{Error, RetryPredicate};
///
/// struct RetryOnUnavailable;
///
/// impl RetryPredicate for RetryOnUnavailable {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(error, Error::Status { status, .. } if status.as_u16() == 503)
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the request should be attempted again.
    ///
    /// `attempt` is the number of the attempt that just failed (1-indexed).
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retry every error marked retryable: transport failures and error statuses.
///
/// This is the default predicate.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retry transport failures and 5xx responses, but give up on 4xx.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnServerError;

impl RetryPredicate for RetryOnServerError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        match error {
            Error::Request(_) => true,
            Error::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// The retry behaviour applied by the call layer.
///
/// Selected once when the client is built, normally from [`SwcConfig`].
#[derive(Clone)]
pub struct RetryPolicy {
    strategy: RetryStrategy,
    predicate: Arc<dyn RetryPredicate>,
}

impl RetryPolicy {
    /// Creates a policy using the default predicate.
    pub fn new(strategy: RetryStrategy) -> Self {
        Self {
            strategy,
            predicate: Arc::new(RetryOnRetryable),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(RetryStrategy::None)
    }

    /// Picks the policy described by the configuration's backoff settings.
    pub fn from_config(config: &SwcConfig) -> Self {
        if config.backoff {
            Self::new(RetryStrategy::exponential(config.backoff_max_time))
        } else {
            Self::none()
        }
    }

    /// Replaces the predicate that decides which errors are retried.
    pub fn with_predicate(mut self, predicate: impl RetryPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// The delay strategy of this policy.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// Returns how long to wait before retrying after `error`, or `None` to give up.
    pub fn next_delay(&self, error: &Error, attempt: usize, elapsed: Duration) -> Option<Duration> {
        if !self.predicate.should_retry(error, attempt) {
            return None;
        }
        self.strategy.delay_for_attempt(attempt, elapsed)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn status_error(code: u16) -> Error {
        Error::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
            url: "http://localhost/".to_string(),
        }
    }

    #[test]
    fn test_exponential_backoff_delays() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_elapsed: Duration::from_secs(60),
            jitter: false,
        };

        let zero = Duration::ZERO;
        assert_eq!(strategy.delay_for_attempt(1, zero), Some(Duration::from_millis(100)));
        assert_eq!(strategy.delay_for_attempt(2, zero), Some(Duration::from_millis(200)));
        assert_eq!(strategy.delay_for_attempt(3, zero), Some(Duration::from_millis(400)));
        assert_eq!(strategy.delay_for_attempt(4, zero), Some(Duration::from_millis(800)));
        assert_eq!(strategy.delay_for_attempt(8, zero), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_budget_truncates_and_exhausts() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(5),
            jitter: false,
        };

        assert_eq!(
            strategy.delay_for_attempt(1, Duration::from_secs(3)),
            Some(Duration::from_secs(2))
        );
        assert_eq!(strategy.delay_for_attempt(2, Duration::from_secs(5)), None);
        assert_eq!(strategy.delay_for_attempt(2, Duration::from_secs(9)), None);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(60),
            jitter: true,
        };

        for _ in 0..50 {
            let delay = strategy.delay_for_attempt(1, Duration::ZERO).unwrap();
            assert!(delay >= Duration::from_millis(500));
            assert!(delay <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_no_retry() {
        let strategy = RetryStrategy::None;
        assert_eq!(strategy.delay_for_attempt(1, Duration::ZERO), None);
        assert_eq!(strategy.max_elapsed(), None);
    }

    #[test]
    fn test_policy_respects_predicate() {
        let policy = RetryPolicy::new(RetryStrategy::exponential(Duration::from_secs(30)))
            .with_predicate(RetryOnServerError);

        assert!(policy.next_delay(&status_error(502), 1, Duration::ZERO).is_some());
        assert!(policy.next_delay(&status_error(404), 1, Duration::ZERO).is_none());

        let schema = Error::Schema {
            record: "Counts",
            message: "missing field".to_string(),
            raw: "{}".to_string(),
        };
        let default_policy = RetryPolicy::new(RetryStrategy::exponential(Duration::from_secs(30)));
        assert!(default_policy.next_delay(&schema, 1, Duration::ZERO).is_none());
        assert!(default_policy.next_delay(&status_error(404), 1, Duration::ZERO).is_some());
    }

    #[test]
    fn test_policy_from_config() {
        let base = SwcConfig::builder().base_url("http://localhost:8000").unwrap();

        let enabled = RetryPolicy::from_config(
            &base
                .clone()
                .backoff(true)
                .backoff_max_time(Duration::from_secs(7))
                .build()
                .unwrap(),
        );
        assert_eq!(enabled.strategy().max_elapsed(), Some(Duration::from_secs(7)));

        let disabled = RetryPolicy::from_config(&base.backoff(false).build().unwrap());
        assert_eq!(disabled.strategy(), &RetryStrategy::None);
    }
}
