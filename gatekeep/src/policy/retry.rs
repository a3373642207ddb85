//! Retry policy for verification requests.
//!
//! A decision starts with a [`RetryBudget`] taken from the [`RetryPolicy`].
//! Every attempt result is fed through [`Transition::next`], which decides
//! whether the decision is over or another attempt should follow after the
//! policy's fixed delay. Keeping this free of I/O means the whole state
//! machine can be exercised without a network.

use std::time::Duration;

use crate::error::GateError;

/// Retry configuration for a verification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub retries: u32,

    /// Constant wait between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Total number of attempts a single decision may make.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// A fresh budget for one decision.
    #[must_use]
    pub const fn budget(&self) -> RetryBudget {
        RetryBudget::new(self.retries)
    }
}

/// Remaining retries for a single decision.
///
/// The counter only ever decreases and saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    initial: u32,
    remaining: u32,
}

impl RetryBudget {
    pub const fn new(retries: u32) -> Self {
        Self {
            initial: retries,
            remaining: retries,
        }
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Attempts made so far, counting the one currently being judged.
    pub const fn attempts(&self) -> u32 {
        (self.initial - self.remaining).saturating_add(1)
    }

    /// Take one retry from the budget.
    ///
    /// Returns `false`, leaving the budget untouched, if none are left.
    pub const fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            false
        } else {
            self.remaining -= 1;
            true
        }
    }
}

/// What a decision does after an attempt.
#[derive(Debug)]
pub enum Transition {
    /// The service answered 200.
    Allow,

    /// The decision is over and the message is refused.
    Deny(GateError),

    /// Wait for the policy delay, then attempt again.
    Retry(GateError),
}

impl Transition {
    /// Advance the decision given the result of one attempt.
    ///
    /// `attempt` is either the HTTP status the service answered with, or
    /// the transport error that prevented an answer. A retry is only taken
    /// for retryable failures, and only while `budget` has retries left.
    pub fn next(attempt: Result<u16, GateError>, budget: &mut RetryBudget) -> Self {
        match attempt.and_then(GateError::from_status) {
            Ok(()) => Self::Allow,
            Err(err) if err.is_retryable() => {
                let attempts = budget.attempts();
                if budget.consume() {
                    Self::Retry(err)
                } else {
                    Self::Deny(GateError::RetryExhausted {
                        attempts,
                        last: Box::new(err),
                    })
                }
            }
            Err(err) => Self::Deny(err),
        }
    }
}
