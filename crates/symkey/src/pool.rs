//! Object pool for writer and reader state
//!
//! Keeps a LIFO free list of reusable states so the hot encode and resolve
//! paths do not reallocate their buffers and tables on every call:
//! - State checkout (reuse or create)
//! - Reset and return on drop
//! - Pool statistics

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// State that can be cleared for reuse
pub trait Reset {
    /// Clear all per-call data, keeping allocations
    fn reset(&mut self);
}

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// States allocated because the free list was empty
    pub total_created: usize,
    /// Checkouts served from the free list
    pub total_reused: usize,
    /// States currently checked out
    pub active_count: usize,
    /// States waiting in the free list
    pub available_count: usize,
    /// States dropped because the free list was full
    pub discarded: usize,
}

impl PoolStats {
    /// Fraction of checkouts served by reuse
    #[must_use]
    pub fn reuse_rate(&self) -> f64 {
        let total = self.total_created + self.total_reused;
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.total_reused as f64 / total as f64;
        rate
    }
}

/// Pool of reusable states
#[derive(Debug)]
pub struct ObjectPool<T> {
    /// Maximum idle states kept
    capacity: usize,
    /// Idle states (LIFO for cache efficiency)
    available: Mutex<Vec<T>>,
    /// Statistics
    stats: Mutex<PoolStats>,
}

impl<T: Reset + Default> ObjectPool<T> {
    /// Create pool keeping at most `capacity` idle states
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(Vec::with_capacity(capacity)),
            stats: Mutex::new(PoolStats::default()),
        }
    }

    /// Check out a state (reuse or create)
    ///
    /// The state is reset and returned to the pool when the guard drops.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let reused = self.available.lock().pop();
        let mut stats = self.stats.lock();
        let item = match reused {
            Some(item) => {
                stats.total_reused += 1;
                stats.available_count = stats.available_count.saturating_sub(1);
                item
            }
            None => {
                stats.total_created += 1;
                T::default()
            }
        };
        stats.active_count += 1;
        Pooled {
            item: Some(item),
            pool: self,
        }
    }

    /// Return a state to the free list
    fn release(&self, mut item: T) {
        item.reset();
        let mut available = self.available.lock();
        let mut stats = self.stats.lock();
        stats.active_count = stats.active_count.saturating_sub(1);
        if available.len() < self.capacity {
            available.push(item);
        } else {
            stats.discarded += 1;
        }
        stats.available_count = available.len();
    }

    /// Get pool statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        *self.stats.lock()
    }

    /// Maximum idle states kept
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Checked-out state, returned to its pool on drop
#[derive(Debug)]
pub struct Pooled<'p, T: Reset + Default> {
    item: Option<T>,
    pool: &'p ObjectPool<T>,
}

impl<T: Reset + Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Only `drop` takes the item out.
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled item accessed after release"),
        }
    }
}

impl<T: Reset + Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled item accessed after release"),
        }
    }
}

impl<T: Reset + Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Scratch {
        data: Vec<u32>,
    }

    impl Reset for Scratch {
        fn reset(&mut self) {
            self.data.clear();
        }
    }

    #[test]
    fn state_is_reset_and_reused() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(2);
        {
            let mut scratch = pool.acquire();
            scratch.data.extend([1, 2, 3]);
        }
        let scratch = pool.acquire();
        assert!(scratch.data.is_empty());
        assert!(scratch.data.capacity() >= 3);
        drop(scratch);

        let stats = pool.stats();
        assert_eq!(stats.total_created, 1);
        assert_eq!(stats.total_reused, 1);
        assert_eq!(stats.active_count, 0);
        assert_eq!(stats.available_count, 1);
    }

    #[test]
    fn concurrent_checkouts_get_distinct_states() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(4);
        let mut a = pool.acquire();
        let mut b = pool.acquire();
        a.data.push(1);
        b.data.push(2);
        assert_eq!(a.data, vec![1]);
        assert_eq!(b.data, vec![2]);
        assert_eq!(pool.stats().active_count, 2);
    }

    #[test]
    fn full_pool_discards_returned_states() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(1);
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        let stats = pool.stats();
        assert_eq!(stats.available_count, 1);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn pool_is_shareable_across_threads() {
        let pool: ObjectPool<Scratch> = ObjectPool::new(8);
        std::thread::scope(|scope| {
            for i in 0..4 {
                let pool = &pool;
                scope.spawn(move || {
                    let mut scratch = pool.acquire();
                    scratch.data.push(i);
                    assert_eq!(scratch.data.len(), 1);
                });
            }
        });
        assert_eq!(pool.stats().active_count, 0);
        assert_eq!(pool.stats().total_created + pool.stats().total_reused, 4);
    }

    #[test]
    fn reuse_rate_of_empty_pool_is_zero() {
        assert!(PoolStats::default().reuse_rate().abs() < f64::EPSILON);
    }
}
