//! Reconnect policy.

use crate::error::ClientError;

/// Errors that retrying cannot fix.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Whether the runner should try again after `error`.
///
/// `current_attempt` is the number of failed attempts so far.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Failed attempts since the last successful connection.
///
/// Every outage gets the full budget: reaching the server again resets it.
#[derive(Debug, Clone)]
pub struct ReconnectBudget {
    failures: u32,
    max_attempts: u32,
}

impl ReconnectBudget {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            failures: 0,
            max_attempts,
        }
    }

    pub fn connected(&mut self) {
        self.failures = 0;
    }

    /// Count a failed or lost session; returns whether to try again.
    pub fn record_failure(&mut self, error: &ClientError) -> bool {
        self.failures += 1;
        should_attempt_reconnect(error, self.failures, self.max_attempts)
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}
