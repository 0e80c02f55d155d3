//! Counting admission gate for simulator processes
//!
//! Capacity is fixed at construction. Slots are handed out as [`SlotPermit`]
//! guards, and a slot returns to the pool when its permit is dropped, so
//! every exit path of a job gives its slot back.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{OrchestratorError, OrchestratorResult};

/// Number of execution units on this host
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

struct LimiterInner {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    holders: AtomicUsize,
    peak: AtomicUsize,
}

/// Shared counting gate with holder instrumentation
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    inner: Arc<LimiterInner>,
}

impl ConcurrencyLimiter {
    pub fn new(capacity: usize) -> OrchestratorResult<Self> {
        if capacity == 0 {
            return Err(OrchestratorError::config("capacity must be at least 1"));
        }
        if capacity > Semaphore::MAX_PERMITS {
            return Err(OrchestratorError::config(format!(
                "capacity {capacity} exceeds the limit of {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            inner: Arc::new(LimiterInner {
                semaphore: Arc::new(Semaphore::new(capacity)),
                capacity,
                holders: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        })
    }

    /// Wait for a free slot. Waiters are not served in any guaranteed order.
    pub async fn acquire(&self) -> OrchestratorResult<SlotPermit> {
        let permit = self
            .inner
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| OrchestratorError::LimiterClosed)?;

        let holders = self.inner.holders.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(holders, Ordering::SeqCst);

        Ok(SlotPermit {
            _permit: permit,
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Slots not currently held
    pub fn available(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn holders(&self) -> usize {
        self.inner.holders.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders seen so far
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ConcurrencyLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrencyLimiter")
            .field("capacity", &self.capacity())
            .field("holders", &self.holders())
            .field("peak", &self.peak())
            .finish()
    }
}

/// A held slot; dropping it releases the slot
pub struct SlotPermit {
    _permit: OwnedSemaphorePermit,
    inner: Arc<LimiterInner>,
}

impl SlotPermit {
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        // Runs before the semaphore permit is returned, so `holders` never
        // counts more than `capacity`.
        self.inner.holders.fetch_sub(1, Ordering::SeqCst);
    }
}
