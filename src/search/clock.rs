//! Time sources for search budgets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic elapsed time since some fixed origin.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Makes a time budget equivalent to a bound on budget checks, so searches
/// are reproducible in tests.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dispatch_routing::search::{Clock, VirtualClock};
///
/// let clock = VirtualClock::new(Duration::from_millis(10));
/// assert_eq!(clock.now(), Duration::ZERO);
/// assert_eq!(clock.now(), Duration::from_millis(10));
/// assert_eq!(clock.reads(), 2);
/// ```
#[derive(Debug)]
pub struct VirtualClock {
    reads: AtomicU64,
    step_nanos: u64,
}

impl VirtualClock {
    /// Creates a clock at zero that advances `step` per read.
    pub fn new(step: Duration) -> Self {
        Self {
            reads: AtomicU64::new(0),
            step_nanos: u64::try_from(step.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// Number of reads so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        let ticks = self.reads.fetch_add(1, Ordering::Relaxed);
        Duration::from_nanos(self.step_nanos.saturating_mul(ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_virtual_clock_saturates() {
        let clock = VirtualClock::new(Duration::MAX);
        clock.now();
        clock.now();
        assert_eq!(clock.now(), Duration::from_nanos(u64::MAX));
    }
}
