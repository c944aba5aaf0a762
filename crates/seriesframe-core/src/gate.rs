//! One-shot completion gate for the producer/consumer handshake.
//!
//! The producer releases the gate exactly once when a table terminates,
//! whatever the termination path (exhaustion, error, cancellation). Any
//! number of consumers can wait on it; waiting after release returns
//! immediately. A second release attempt is a no-op, so the "closed at
//! most once" invariant holds structurally.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Single-use gate signalling that a table will produce no more rows.
#[derive(Debug, Default)]
pub struct DoneGate {
    released: AtomicBool,
    notify: Notify,
}

impl DoneGate {
    /// An unreleased gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the gate, waking every waiter.
    ///
    /// Returns `true` on the first call and `false` on every later call;
    /// later calls have no other effect.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.notify.notify_waiters();
        true
    }

    /// True iff the gate has been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Waits until the gate is released.
    pub async fn wait(&self) {
        // Register with the notifier before re-checking the flag so a
        // release between the check and the await cannot be missed.
        let notified = self.notify.notified();
        if self.is_released() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn release_is_once_only() {
        let gate = DoneGate::new();
        assert!(!gate.is_released());
        assert!(gate.release());
        assert!(!gate.release());
        assert!(gate.is_released());
    }

    #[tokio::test]
    async fn wait_returns_immediately_after_release() {
        let gate = DoneGate::new();
        gate.release();
        gate.wait().await;
    }

    #[tokio::test]
    async fn wait_is_woken_by_release() {
        let gate = Arc::new(DoneGate::new());

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        gate.release();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn multiple_waiters_are_all_woken() {
        let gate = Arc::new(DoneGate::new());

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move { gate.wait().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        gate.release();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter should be woken")
                .expect("waiter task should not panic");
        }
    }
}
