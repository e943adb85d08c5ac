use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::error::{Error, Result};

/// Local request budget of one endpoint
///
/// Never waits: an exhausted budget fails the call before anything is sent.
pub(crate) struct EndpointLimiter<C: Clock = DefaultClock> {
    endpoint: &'static str,
    limiter: RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>,
}

impl EndpointLimiter {
    pub fn per_minute(endpoint: &'static str, requests: NonZeroU32) -> Self {
        Self::with_clock(endpoint, requests, &DefaultClock::default())
    }
}

impl<C: Clock> EndpointLimiter<C> {
    pub fn with_clock(endpoint: &'static str, requests: NonZeroU32, clock: &C) -> Self {
        Self {
            endpoint,
            limiter: RateLimiter::direct_with_clock(Quota::per_minute(requests), clock),
        }
    }

    /// Take one request from the budget
    pub fn check(&self) -> Result<()> {
        self.limiter.check().map_err(|_| {
            log::warn!("Local rate limit reached for {}", self.endpoint);
            Error::RateLimited(self.endpoint.to_string())
        })
    }
}

impl<C: Clock> std::fmt::Debug for EndpointLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointLimiter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
