//! Per-type execution resource tracking.

use crate::interner::TypeId;

/// Remaining capacity per operation type.
///
/// Maintains the invariant `0 <= available[t] <= capacity[t]`: every unit
/// acquired by a dispatched operation is released exactly once, when that
/// operation finishes.
#[derive(Clone, Debug)]
pub struct ResourcePool {
    capacity: Vec<u32>,
    available: Vec<u32>,
}

impl ResourcePool {
    /// Create a pool with every resource idle.
    pub fn new(capacities: &[u32]) -> Self {
        Self {
            capacity: capacities.to_vec(),
            available: capacities.to_vec(),
        }
    }

    /// Units of `op_type` not currently in use.
    #[inline]
    pub fn available(&self, op_type: TypeId) -> u32 {
        self.available[op_type as usize]
    }

    /// Units of `op_type` currently in use.
    pub fn in_use(&self, op_type: TypeId) -> u32 {
        self.capacity[op_type as usize] - self.available[op_type as usize]
    }

    /// Take one unit of `op_type` if any is free.
    pub fn try_acquire(&mut self, op_type: TypeId) -> bool {
        let slot = &mut self.available[op_type as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Return one unit of `op_type`.
    ///
    /// # Panics
    /// If no unit of `op_type` is in use, meaning a release was doubled.
    pub fn release(&mut self, op_type: TypeId) {
        let idx = op_type as usize;
        assert!(
            self.available[idx] < self.capacity[idx],
            "released more units of type {} than were acquired",
            op_type
        );
        self.available[idx] += 1;
    }

    /// True when nothing is in use.
    pub fn is_idle(&self) -> bool {
        self.available == self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = ResourcePool::new(&[2, 1]);

        assert!(pool.try_acquire(0));
        assert!(pool.try_acquire(0));
        assert!(!pool.try_acquire(0));
        assert_eq!(pool.available(0), 0);
        assert_eq!(pool.in_use(0), 2);
        assert_eq!(pool.available(1), 1);
    }

    #[test]
    fn test_release_restores_capacity() {
        let mut pool = ResourcePool::new(&[1]);

        assert!(pool.try_acquire(0));
        assert!(!pool.is_idle());
        pool.release(0);
        assert!(pool.is_idle());
        assert!(pool.try_acquire(0));
    }

    #[test]
    #[should_panic(expected = "released more units")]
    fn test_double_release_panics() {
        let mut pool = ResourcePool::new(&[1]);
        pool.release(0);
    }
}
