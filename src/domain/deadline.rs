//! Run-wide wall-clock deadline
//!
//! The start instant is taken once per run. Callers ask whether the limit
//! has passed at root boundaries only; nothing below a root is preempted.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current instant, swappable in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Elapsed-time budget shared by every check of one run
#[derive(Clone)]
pub struct Deadline {
    clock: Arc<dyn Clock>,
    started_at: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start the budget now, on the system clock
    pub fn start(limit: Duration) -> Self {
        Self::start_with_clock(Arc::new(SystemClock), limit)
    }

    pub fn start_with_clock(clock: Arc<dyn Clock>, limit: Duration) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            started_at,
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started_at)
    }

    pub const fn limit(&self) -> Duration {
        self.limit
    }

    /// True once more than the limit has elapsed.
    ///
    /// A zero limit is exceeded from the start, so such a run processes no
    /// root at all.
    pub fn is_exceeded(&self) -> bool {
        self.limit.is_zero() || self.elapsed() > self.limit
    }
}

impl fmt::Debug for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deadline")
            .field("elapsed", &self.elapsed())
            .field("limit", &self.limit)
            .finish()
    }
}
