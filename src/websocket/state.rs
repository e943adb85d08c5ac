use std::time::Duration;

use crate::config::RetryConfig;

/// Lifecycle state of an event socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// A connection attempt is in flight
    Connecting,
    /// The transport is open and the handshake was sent
    Open,
    /// A graceful close was requested
    Closing,
    /// No transport
    #[default]
    Closed,
}

/// Linear backoff over consecutive failed connection attempts
///
/// The delay before the next attempt is `(tries + 1) * base_interval`,
/// optionally capped by `max_delay`.
#[derive(Debug, Clone)]
pub(crate) struct RetrySchedule {
    tries: u32,
    base_interval: Duration,
    max_delay: Option<Duration>,
    max_attempts: Option<u32>,
}

impl RetrySchedule {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            tries: 0,
            base_interval: config.base_interval,
            max_delay: config.max_delay,
            max_attempts: config.max_attempts,
        }
    }

    /// Record a failure and get the delay before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.base_interval.saturating_mul(self.tries.saturating_add(1));
        self.tries = self.tries.saturating_add(1);
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// True once the configured attempt limit has been used up
    pub fn exhausted(&self) -> bool {
        self.max_attempts.is_some_and(|max| self.tries >= max)
    }

    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Forget past failures after a successful open
    pub fn reset(&mut self) {
        self.tries = 0;
    }
}
