//! Retry controller.
//!
//! States: Attempting → Succeeded | Retrying | Failed. Retrying sleeps for
//! `next attempt index × delay_unit` and goes back to Attempting with the request's
//! retry count bumped. The transition out of a failed attempt is the pure function
//! `RetryPolicy::decide` of (error category, attempt index, retry budget).

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::translation::errors::{ErrorCategory, TranslationError};
use crate::translation::pipeline::TranslationRequest;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed beyond the first.
    pub max_retries: u32,
    pub delay_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_unit: DEFAULT_DELAY_UNIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { delay: Duration },
    Fail,
}

impl RetryPolicy {
    /// What to do after attempt `attempt` (0-based) failed with `category`.
    pub fn decide(&self, category: ErrorCategory, attempt: u32) -> RetryDecision {
        if !category.is_retry_eligible() || attempt >= self.max_retries {
            return RetryDecision::Fail;
        }
        RetryDecision::Retry {
            delay: self.delay_unit * (attempt + 1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Runs `attempt` with a snapshot of `request` until it succeeds or the policy
    /// gives up. A retry-eligible error that exhausts the budget comes back wrapped
    /// in `RetryBudgetExhausted`; a fatal error comes back as it is.
    pub async fn run<T, F, Fut>(
        &self,
        request: &mut TranslationRequest,
        mut attempt: F,
    ) -> Result<T, TranslationError>
    where
        F: FnMut(TranslationRequest) -> Fut,
        Fut: Future<Output = Result<T, TranslationError>>,
    {
        loop {
            let index = request.retry_count;
            info!(
                "Translation attempt {}/{} into {}",
                index + 1,
                self.policy.max_retries + 1,
                request.target
            );

            let err = match attempt(request.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match self.policy.decide(err.category(), index) {
                RetryDecision::Retry { delay } => {
                    warn!(
                        "Attempt {} failed ({err}); retrying in {}ms",
                        index + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    request.retry_count += 1;
                }
                RetryDecision::Fail if err.is_retry_eligible() => {
                    error!("Retry budget exhausted after {} attempts: {err}", index + 1);
                    return Err(TranslationError::RetryBudgetExhausted {
                        attempts: index + 1,
                        last: Box::new(err),
                    });
                }
                RetryDecision::Fail => {
                    error!("Attempt {} failed with a non-retryable error: {err}", index + 1);
                    return Err(err);
                }
            }
        }
    }
}
