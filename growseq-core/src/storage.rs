//! Exact-size backing buffers.
//!
//! A [`Storage`] tracks its slot count separately from the underlying `Vec`,
//! so the capacity a sequence reports is always the one it asked for, even if
//! the allocator hands back a larger block.

use std::mem;

use tracing::trace;

use crate::error::{SeqError, SeqResult};

/// Owned buffer holding up to `capacity` values of `T`.
#[derive(Debug)]
pub(crate) struct Storage<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Storage<T> {
    /// An empty buffer that owns no memory.
    pub(crate) const fn released() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    /// Allocate room for exactly `capacity` values.
    ///
    /// Fails without allocating when `capacity * size_of::<T>()` overflows or
    /// exceeds `max_bytes`.
    pub(crate) fn allocate(capacity: usize, max_bytes: Option<usize>) -> SeqResult<Self> {
        let bytes = capacity
            .checked_mul(mem::size_of::<T>())
            .ok_or(SeqError::AllocationFailed)?;
        if let Some(max_bytes) = max_bytes {
            if bytes > max_bytes {
                trace!(bytes, max_bytes, "allocation exceeds storage ceiling");
                return Err(SeqError::AllocationFailed);
            }
        }

        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| SeqError::AllocationFailed)?;

        Ok(Self { items, capacity })
    }

    /// Move every value into a new, larger buffer.
    ///
    /// The new buffer is allocated before anything is moved; on failure `self`
    /// is left untouched.
    pub(crate) fn grow_to(
        &mut self,
        new_capacity: usize,
        max_bytes: Option<usize>,
    ) -> SeqResult<()> {
        debug_assert!(new_capacity >= self.items.len());

        let mut grown = Self::allocate(new_capacity, max_bytes)?;
        grown.items.append(&mut self.items);
        trace!(from = self.capacity, to = new_capacity, "storage grown");
        *self = grown;
        Ok(())
    }

    /// A new, empty buffer with the same capacity as this one.
    pub(crate) fn fresh(&self, max_bytes: Option<usize>) -> SeqResult<Self> {
        Self::allocate(self.capacity, max_bytes)
    }

    /// Store `item` in the next free slot.
    ///
    /// The caller grows the buffer first when it is full.
    pub(crate) fn push(&mut self, item: T) {
        debug_assert!(self.items.len() < self.capacity, "storage is full");
        self.items.push(item);
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Size of the buffer in bytes.
    pub(crate) fn bytes(&self) -> usize {
        self.capacity * mem::size_of::<T>()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Copy> Storage<T> {
    /// Copy `values` into the free slots following the stored ones.
    pub(crate) fn extend_from_slice(&mut self, values: &[T]) {
        debug_assert!(
            self.items.len() + values.len() <= self.capacity,
            "storage is full"
        );
        self.items.extend_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_exact_capacity() {
        let storage = Storage::<u32>::allocate(8, None).unwrap();
        assert_eq!(storage.capacity(), 8);
        assert_eq!(storage.bytes(), 32);
        assert_eq!(storage.len(), 0);
        assert!(!storage.is_full());
    }

    #[test]
    fn test_allocate_zero_capacity() {
        let storage = Storage::<u64>::allocate(0, None).unwrap();
        assert_eq!(storage.bytes(), 0);
        assert!(storage.is_full());
    }

    #[test]
    fn test_allocate_respects_ceiling() {
        assert!(Storage::<u32>::allocate(4, Some(16)).is_ok());
        assert_eq!(
            Storage::<u32>::allocate(5, Some(16)).unwrap_err(),
            SeqError::AllocationFailed
        );
    }

    #[test]
    fn test_allocate_overflow() {
        assert_eq!(
            Storage::<u64>::allocate(usize::MAX, None).unwrap_err(),
            SeqError::AllocationFailed
        );
    }

    #[test]
    fn test_grow_keeps_values() {
        let mut storage = Storage::<u32>::allocate(2, None).unwrap();
        storage.push(1);
        storage.push(2);
        assert!(storage.is_full());

        storage.grow_to(4, None).unwrap();
        assert_eq!(storage.capacity(), 4);
        assert_eq!(storage.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_failed_grow_leaves_buffer_untouched() {
        let mut storage = Storage::<u32>::allocate(2, Some(8)).unwrap();
        storage.push(7);
        storage.push(9);

        assert!(storage.grow_to(4, Some(8)).is_err());
        assert_eq!(storage.capacity(), 2);
        assert_eq!(storage.as_slice(), &[7, 9]);
    }

    #[test]
    fn test_extend_from_slice() {
        let mut storage = Storage::<u8>::allocate(6, None).unwrap();
        storage.extend_from_slice(&[1, 2, 3]);
        storage.extend_from_slice(&[4, 5, 6]);
        assert!(storage.is_full());
        assert_eq!(storage.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_released_owns_nothing() {
        let storage = Storage::<u32>::released();
        assert_eq!(storage.capacity(), 0);
        assert_eq!(storage.bytes(), 0);
    }
}
