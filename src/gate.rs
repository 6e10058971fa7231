// src/gate.rs
// =============================================================================
// Limits how many site generations run at the same time.
//
// Every generation request takes a permit before it starts crawling and
// gives it back when it finishes (the permit is released on drop, so early
// returns and panics release it too). A request waiting for a permit can
// still be cancelled; it then never starts.
//
// Built on tokio::sync::Semaphore, which hands out permits in FIFO order.
// =============================================================================

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Default number of generations allowed in flight at once
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// A counting gate shared by every generation request
///
/// Cloning is cheap; all clones share the same permits.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// Proof that a generation may run; the slot is freed when this is dropped
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    // Creates a gate with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    // Waits for a free slot
    //
    // Returns: a permit to hold for the duration of the work
    //
    // Errors: Cancelled if `cancel` fires first. Nothing is acquired in that
    // case, so the other waiters are unaffected.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<GatePermit> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            permit = self.slots.clone().acquire_owned() => permit,
        };

        // acquire_owned only fails once the semaphore is closed, which means
        // the gate is shutting down: treat it like a cancellation
        let permit = permit.map_err(|_| Error::Cancelled)?;
        Ok(GatePermit { _permit: permit })
    }

    /// Number of free slots right now
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Total number of slots, busy or not
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let gate = ConcurrencyGate::new(2);
        let cancel = CancellationToken::new();

        let first = gate.acquire(&cancel).await.unwrap();
        let _second = gate.acquire(&cancel).await.unwrap();
        assert_eq!(gate.available(), 0);
        assert_eq!(gate.capacity(), 2);

        drop(first);
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        assert_eq!(ConcurrencyGate::new(0).available(), 1);
        assert_eq!(ConcurrencyGate::new(0).capacity(), 1);
        assert_eq!(ConcurrencyGate::default().available(), DEFAULT_MAX_CONCURRENT);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_gives_up() {
        let gate = ConcurrencyGate::new(1);
        let held = gate.acquire(&CancellationToken::new()).await.unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = gate.acquire(&cancel).await;
        assert!(matches!(result, Err(Error::Cancelled)));

        // The held permit is untouched and the slot comes back on release
        assert_eq!(gate.available(), 0);
        drop(held);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_never_acquires() {
        let gate = ConcurrencyGate::new(3);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(gate.acquire(&cancel).await.is_err());
        assert_eq!(gate.available(), 3);
    }

    #[tokio::test]
    async fn test_never_more_than_capacity_in_flight() {
        let gate = ConcurrencyGate::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let gate = gate.clone();
            let running = running.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire(&CancellationToken::new()).await.unwrap();
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.available(), 3);
    }
}
