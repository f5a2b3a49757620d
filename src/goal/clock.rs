//! Wall-clock access for expiry checks.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time in seconds since the Unix epoch.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            // Clock before the epoch: treat as 0 instead of panicking.
            .unwrap_or(0)
    }
}

/// Manually driven clock for deterministic evaluation.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicU64,
}

impl FixedTimeSource {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedTimeSource::new(1_700_000_000);
        assert_eq!(clock.now(), 1_700_000_000);
        clock.advance(60);
        assert_eq!(clock.now(), 1_700_000_060);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemTimeSource.now() > 1_577_836_800);
    }
}
