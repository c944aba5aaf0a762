//! Shared memory accounting for column buffer construction.
//!
//! The surrounding engine owns one [`MemoryTracker`] and threads an
//! `Arc` of it through every table it constructs, so total buffer bytes
//! across all concurrently live tables stay under one budget. The tracker
//! accounts reservations; it does not allocate. Every column buffer build
//! charges the tracker up front and the charge is returned when the batch
//! is replaced or the table is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};

use snafu::prelude::*;

/// Errors from the memory accounting layer.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MemoryError {
    /// A reservation would push usage past the configured budget.
    ///
    /// Fatal for the refill cycle that requested it; recoverable only at a
    /// higher layer, by shrinking batches or releasing other tables.
    #[snafu(display(
        "memory budget exceeded: requested {requested} bytes with {in_use} of {limit} in use"
    ))]
    LimitExceeded {
        /// Bytes the rejected reservation asked for.
        requested: usize,
        /// Bytes reserved across all tables at the time of the request.
        in_use: usize,
        /// Configured budget in bytes.
        limit: usize,
    },
}

/// Reference-counted reservation tracker shared by all live tables.
#[derive(Debug)]
pub struct MemoryTracker {
    limit: usize,
    used: AtomicUsize,
}

impl MemoryTracker {
    /// Tracker with a hard budget of `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// Tracker that accounts usage but never rejects a reservation.
    pub fn unbounded() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Reserves `bytes` against the budget.
    ///
    /// Uses a compare-exchange loop so concurrent reservations from
    /// multiple tables never overshoot the limit between check and commit.
    pub fn allocate(&self, bytes: usize) -> Result<(), MemoryError> {
        let mut current = self.used.load(Ordering::Relaxed);
        loop {
            let next = match current.checked_add(bytes) {
                Some(n) if n <= self.limit => n,
                _ => {
                    return LimitExceededSnafu {
                        requested: bytes,
                        in_use: current,
                        limit: self.limit,
                    }
                    .fail();
                }
            };
            match self.used.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns `bytes` previously reserved with [`MemoryTracker::allocate`].
    pub fn free(&self, bytes: usize) {
        self.used.fetch_sub(bytes, Ordering::AcqRel);
    }

    /// Bytes currently reserved across all users of the tracker.
    pub fn allocated(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// Configured budget in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_within_limit() {
        let tracker = MemoryTracker::with_limit(100);
        tracker.allocate(60).expect("within budget");
        tracker.allocate(40).expect("exactly at budget");
        assert_eq!(tracker.allocated(), 100);
    }

    #[test]
    fn allocate_past_limit_reports_usage() {
        let tracker = MemoryTracker::with_limit(100);
        tracker.allocate(80).expect("within budget");

        let err = tracker.allocate(40).expect_err("over budget");
        let MemoryError::LimitExceeded {
            requested,
            in_use,
            limit,
        } = err;
        assert_eq!(requested, 40);
        assert_eq!(in_use, 80);
        assert_eq!(limit, 100);

        // The failed reservation must not leak into the accounting.
        assert_eq!(tracker.allocated(), 80);
    }

    #[test]
    fn free_returns_capacity() {
        let tracker = MemoryTracker::with_limit(100);
        tracker.allocate(100).expect("within budget");
        tracker.free(60);
        tracker.allocate(50).expect("freed capacity is reusable");
        assert_eq!(tracker.allocated(), 90);
    }

    #[test]
    fn unbounded_never_rejects() {
        let tracker = MemoryTracker::unbounded();
        tracker.allocate(usize::MAX / 2).expect("no budget");
        assert_eq!(tracker.limit(), usize::MAX);
    }
}
