//! Per-job-type rate limiting.
//!
//! Each job type gets its own governor limiter, sized from its `JobPolicy`.
//! Limits hold per worker process; cross-process limits come from the
//! function's reserved concurrency.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::models::JobKind;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub struct Throttle {
    limiters: HashMap<JobKind, DirectRateLimiter>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_job_policies()
    }
}

impl Throttle {
    /// One limiter per job type, allowing a single run per `min_interval`.
    #[must_use]
    pub fn from_job_policies() -> Self {
        Self::from_intervals(
            JobKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.policy().min_interval)),
        )
    }

    /// Job kinds with a zero interval are not limited at all.
    #[must_use]
    pub fn from_intervals(intervals: impl IntoIterator<Item = (JobKind, Duration)>) -> Self {
        let limiters = intervals
            .into_iter()
            .filter_map(|(kind, interval)| {
                Quota::with_period(interval).map(|quota| (kind, RateLimiter::direct(quota)))
            })
            .collect();
        Self { limiters }
    }

    /// Wait until a job of this kind may start.
    pub async fn acquire(&self, kind: JobKind) {
        if let Some(limiter) = self.limiters.get(&kind) {
            limiter.until_ready().await;
        }
    }

    /// Take a permit if one is free right now.
    #[must_use]
    pub fn try_acquire(&self, kind: JobKind) -> bool {
        self.limiters
            .get(&kind)
            .is_none_or(|limiter| limiter.check().is_ok())
    }
}
