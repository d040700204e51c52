//! Time-ordered unique id allocation.
//!
//! Ids carry a millisecond timestamp in the high bits and a per-millisecond
//! sequence in the low bits, so they sort roughly by creation time. A single
//! `AtomicU64` holds the last issued value; allocation is a lock-free CAS
//! loop that never blocks callers.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Allocation epoch: 2024-01-01T00:00:00Z. Keeps ids well inside the
/// positive `i64` range used by the BIGINT columns.
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Low bits reserved for the per-millisecond sequence.
const SEQ_BITS: u32 = 16;

/// Allocator for request, resident and payment ids.
pub struct IdAllocator {
    last: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Allocate the next id.
    ///
    /// Non-decreasing with wall-clock time. If the clock regresses, the
    /// allocator degrades to counter mode (previous value + 1) rather than
    /// reissuing an already-handed-out id.
    pub fn next(&self) -> u64 {
        loop {
            let now_ms = (Utc::now().timestamp_millis() - EPOCH_MS).max(0) as u64;
            let floor = now_ms << SEQ_BITS;
            let prev = self.last.load(Ordering::Acquire);
            let candidate = if floor > prev { floor } else { prev + 1 };
            if self
                .last
                .compare_exchange(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return candidate;
            }
        }
    }

    /// Same id, as the signed type the BIGINT columns store.
    pub fn next_i64(&self) -> i64 {
        self.next() as i64
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_strictly_increase() {
        let alloc = IdAllocator::new();
        let mut prev = alloc.next();
        for _ in 0..10_000 {
            let next = alloc.next();
            assert!(next > prev, "ids must be strictly increasing");
            prev = next;
        }
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let alloc = Arc::new(IdAllocator::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let alloc = alloc.clone();
            handles.push(std::thread::spawn(move || {
                (0..5_000).map(|_| alloc.next()).collect::<Vec<u64>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8 * 5_000);
    }

    #[test]
    fn test_ids_fit_in_i64() {
        let alloc = IdAllocator::new();
        let id = alloc.next_i64();
        assert!(id > 0);
    }
}
