//! Growable, append-only sequence with a single iteration cursor.
//!
//! [`GrowableSequence`] owns its backing storage outright. Storage is
//! allocated up front, doubled whenever an append finds it full, and released
//! on [`GrowableSequence::destroy`] or drop.
//!
//! Every public operation first checks the instance signature. A destroyed
//! instance keeps a dead signature, so later calls report
//! [`SeqError::InvalidSignature`] instead of touching released memory.
//!
//! # Example
//!
//! ```
//! use growseq_core::{GrowableSequence, SeqError};
//!
//! let mut seq = GrowableSequence::<u32>::new(2)?;
//! seq.append(10)?;
//! seq.append(20)?;
//! seq.append(30)?;
//! assert_eq!(seq.capacity(), 4);
//!
//! seq.reset_cursor()?;
//! assert_eq!(seq.next_item()?, 10);
//! assert_eq!(seq.next_item()?, 20);
//! assert_eq!(seq.next_item()?, 30);
//! assert_eq!(seq.next_item(), Err(SeqError::EndOfSequence));
//! # Ok::<(), growseq_core::SeqError>(())
//! ```

use std::mem;

use tracing::debug;

use crate::{
    config::SequenceConfig,
    error::{SeqError, SeqResult, report},
    storage::Storage,
};

/// Signature carried by a live instance.
pub(crate) const LIVE_SIGNATURE: u32 = 0x6753_6571;

/// Signature written by `destroy`.
pub(crate) const DEAD_SIGNATURE: u32 = 0x1;

/// Capacity the next growth step produces from `capacity`.
///
/// Doubles, with a floor of one slot so that an empty buffer can grow.
/// Returns `None` on overflow.
pub fn grown_capacity(capacity: usize) -> Option<usize> {
    capacity.checked_mul(2).map(|doubled| doubled.max(1))
}

/// Capacity reached after `appends` appends to a sequence constructed with
/// `initial_capacity`.
///
/// This is the smallest `initial_capacity * 2^m` (with the zero floor
/// applied) that is at least `appends`. Returns `None` on overflow.
pub fn capacity_after(initial_capacity: usize, appends: usize) -> Option<usize> {
    let mut capacity = initial_capacity;
    while capacity < appends {
        capacity = grown_capacity(capacity)?;
    }
    Some(capacity)
}

/// Append-only sequence of `T` with amortized O(1) growth.
///
/// Not synchronized. Wrap it in [`SharedSequence`](crate::SharedSequence) to
/// use one instance from several threads.
#[derive(Debug)]
pub struct GrowableSequence<T> {
    signature: u32,
    storage: Storage<T>,
    cursor: usize,
    max_storage_bytes: Option<usize>,
}

impl<T> GrowableSequence<T> {
    /// Construct a sequence with room for `initial_capacity` elements.
    ///
    /// # Errors
    ///
    /// [`SeqError::AllocationFailed`] if the buffer cannot be allocated.
    pub fn new(initial_capacity: usize) -> SeqResult<Self> {
        Self::with_config(&SequenceConfig::default().with_initial_capacity(initial_capacity))
    }

    /// Construct a sequence from `config`.
    ///
    /// The storage ceiling in `config` applies to every later growth.
    pub fn with_config(config: &SequenceConfig) -> SeqResult<Self> {
        let storage = report(
            "new",
            Storage::allocate(config.initial_capacity, config.max_storage_bytes),
        )?;
        debug!(
            capacity = config.initial_capacity,
            element_size = mem::size_of::<T>(),
            "sequence constructed"
        );

        Ok(Self {
            signature: LIVE_SIGNATURE,
            storage,
            cursor: 0,
            max_storage_bytes: config.max_storage_bytes,
        })
    }

    /// Check that this instance is live.
    ///
    /// # Errors
    ///
    /// [`SeqError::InvalidSignature`] after [`destroy`](Self::destroy) or if
    /// the signature has been overwritten.
    pub fn validate(&self) -> SeqResult<()> {
        if self.signature == LIVE_SIGNATURE {
            Ok(())
        } else {
            Err(SeqError::InvalidSignature)
        }
    }

    /// Returns true while the instance has not been destroyed.
    pub fn is_live(&self) -> bool {
        self.validate().is_ok()
    }

    /// Copy `item` into the next free slot, growing storage first if full.
    ///
    /// # Errors
    ///
    /// [`SeqError::AllocationFailed`] if growth fails; the sequence is then
    /// unchanged.
    pub fn append(&mut self, item: T) -> SeqResult<()> {
        report("append", self.try_append(item))
    }

    fn try_append(&mut self, item: T) -> SeqResult<()> {
        self.validate()?;

        if self.storage.is_full() {
            let new_capacity =
                grown_capacity(self.storage.capacity()).ok_or(SeqError::AllocationFailed)?;
            self.storage.grow_to(new_capacity, self.max_storage_bytes)?;
        }

        self.storage.push(item);
        Ok(())
    }

    /// Rewind the cursor to the first element.
    pub fn reset_cursor(&mut self) -> SeqResult<()> {
        report("reset_cursor", self.validate())?;
        self.cursor = 0;
        Ok(())
    }

    /// Drop every element and start over with a fresh buffer of the same
    /// capacity.
    ///
    /// The replacement buffer is allocated before the old one is released.
    ///
    /// # Errors
    ///
    /// [`SeqError::AllocationFailed`] if the replacement cannot be allocated;
    /// the sequence is then unchanged and still usable.
    pub fn clear(&mut self) -> SeqResult<()> {
        report("clear", self.try_clear())
    }

    fn try_clear(&mut self) -> SeqResult<()> {
        self.validate()?;
        let fresh = self.storage.fresh(self.max_storage_bytes)?;
        self.storage = fresh;
        self.cursor = 0;
        Ok(())
    }

    /// Invalidate the instance and release its storage.
    ///
    /// Any later operation fails with [`SeqError::InvalidSignature`].
    pub fn destroy(&mut self) -> SeqResult<()> {
        report("destroy", self.validate())?;
        self.signature = DEAD_SIGNATURE;
        self.storage = Storage::released();
        self.cursor = 0;
        debug!("sequence destroyed");
        Ok(())
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements storage can hold before the next growth.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Size of the backing buffer in bytes, `capacity * element_size`.
    pub fn storage_bytes(&self) -> usize {
        self.storage.bytes()
    }

    /// Position of the next element [`next_item`](Self::next_item) returns.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_storage_bytes(&self) -> Option<usize> {
        self.max_storage_bytes
    }

    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[cfg(test)]
    pub(crate) fn overwrite_signature(&mut self, signature: u32) {
        self.signature = signature;
    }
}

impl<T: Clone> GrowableSequence<T> {
    /// Copy out the element under the cursor and advance.
    ///
    /// # Errors
    ///
    /// [`SeqError::EndOfSequence`] once every element has been returned. The
    /// cursor stays put, so repeated calls keep failing the same way until
    /// [`reset_cursor`](Self::reset_cursor).
    pub fn next_item(&mut self) -> SeqResult<T> {
        report("next_item", self.try_next_item())
    }

    fn try_next_item(&mut self) -> SeqResult<T> {
        self.validate()?;
        let item = self
            .storage
            .as_slice()
            .get(self.cursor)
            .cloned()
            .ok_or(SeqError::EndOfSequence)?;
        self.cursor += 1;
        Ok(item)
    }

    /// Iterate from the cursor to the end, advancing the cursor as it goes.
    ///
    /// Stops on `EndOfSequence` or on any other failure.
    pub fn cursor_items(&mut self) -> CursorItems<'_, T> {
        CursorItems { sequence: self }
    }
}

/// Iterator returned by [`GrowableSequence::cursor_items`].
#[derive(Debug)]
pub struct CursorItems<'a, T> {
    sequence: &'a mut GrowableSequence<T>,
}

impl<T: Clone> Iterator for CursorItems<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.sequence.next_item().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.sequence.is_live() {
            self.sequence.len().saturating_sub(self.sequence.cursor)
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl<'a, T> IntoIterator for &'a GrowableSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(0), Some(1));
        assert_eq!(grown_capacity(1), Some(2));
        assert_eq!(grown_capacity(6), Some(12));
        assert_eq!(grown_capacity(usize::MAX), None);
    }

    #[test]
    fn test_capacity_after() {
        assert_eq!(capacity_after(2, 3), Some(4));
        assert_eq!(capacity_after(4, 4), Some(4));
        assert_eq!(capacity_after(0, 0), Some(0));
        assert_eq!(capacity_after(0, 3), Some(4));
        assert_eq!(capacity_after(3, 7), Some(12));
    }

    #[test]
    fn test_new_is_empty() {
        let seq = GrowableSequence::<u32>::new(4).unwrap();
        assert!(seq.is_live());
        assert!(seq.is_empty());
        assert_eq!(seq.capacity(), 4);
        assert_eq!(seq.element_size(), 4);
        assert_eq!(seq.storage_bytes(), 16);
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn test_zero_capacity_grows_to_one() {
        let mut seq = GrowableSequence::<u16>::new(0).unwrap();
        seq.append(5).unwrap();
        assert_eq!(seq.capacity(), 1);
        seq.append(6).unwrap();
        assert_eq!(seq.capacity(), 2);
        assert_eq!(seq.as_slice(), &[5, 6]);
    }

    #[test]
    fn test_next_stops_at_end() {
        let mut seq = GrowableSequence::<u8>::new(1).unwrap();
        seq.append(1).unwrap();
        assert_eq!(seq.next_item(), Ok(1));
        assert_eq!(seq.next_item(), Err(SeqError::EndOfSequence));
        assert_eq!(seq.next_item(), Err(SeqError::EndOfSequence));
        assert_eq!(seq.cursor(), 1);
    }

    #[test]
    fn test_append_after_end_is_visible() {
        let mut seq = GrowableSequence::<u8>::new(1).unwrap();
        seq.append(1).unwrap();
        assert_eq!(seq.next_item(), Ok(1));
        assert!(seq.next_item().is_err());
        seq.append(2).unwrap();
        assert_eq!(seq.next_item(), Ok(2));
    }

    #[test]
    fn test_growth_failure_is_not_destructive() {
        let config = SequenceConfig::default()
            .with_initial_capacity(2)
            .with_max_storage_bytes(Some(8));
        let mut seq = GrowableSequence::<u32>::with_config(&config).unwrap();
        seq.append(1).unwrap();
        seq.append(2).unwrap();
        seq.next_item().unwrap();

        assert_eq!(seq.append(3), Err(SeqError::AllocationFailed));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.capacity(), 2);
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.as_slice(), &[1, 2]);
        assert!(seq.is_live());
    }

    #[test]
    fn test_construct_over_ceiling_fails() {
        let config = SequenceConfig::bounded(8).with_initial_capacity(3);
        assert_eq!(
            GrowableSequence::<u32>::with_config(&config).unwrap_err(),
            SeqError::AllocationFailed
        );
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut seq = GrowableSequence::<u64>::new(2).unwrap();
        for i in 0..5 {
            seq.append(i).unwrap();
        }
        seq.next_item().unwrap();
        seq.clear().unwrap();
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.capacity(), 8);
    }

    #[test]
    fn test_clear_failure_leaves_sequence_intact() {
        let mut seq = GrowableSequence::<u32>::new(2).unwrap();
        seq.append(1).unwrap();
        seq.append(2).unwrap();
        // replacement buffer no longer fits under the ceiling
        seq.max_storage_bytes = Some(4);

        assert_eq!(seq.clear(), Err(SeqError::AllocationFailed));
        assert!(seq.is_live());
        assert_eq!(seq.as_slice(), &[1, 2]);
        assert_eq!(seq.capacity(), 2);
    }

    #[test]
    fn test_destroy_rejects_later_calls() {
        let mut seq = GrowableSequence::<i32>::new(2).unwrap();
        seq.append(1).unwrap();
        seq.destroy().unwrap();

        assert!(!seq.is_live());
        assert_eq!(seq.validate(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.append(2), Err(SeqError::InvalidSignature));
        assert_eq!(seq.reset_cursor(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.next_item(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.clear(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.destroy(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.capacity(), 0);
        assert!(seq.as_slice().is_empty());
    }

    #[test]
    fn test_corrupted_signature() {
        let mut seq = GrowableSequence::<i32>::new(2).unwrap();
        seq.append(1).unwrap();
        seq.overwrite_signature(0xdead_beef);

        assert_eq!(seq.validate(), Err(SeqError::InvalidSignature));
        assert_eq!(seq.append(2), Err(SeqError::InvalidSignature));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_cursor_items() {
        let mut seq = GrowableSequence::<char>::new(2).unwrap();
        for c in "abc".chars() {
            seq.append(c).unwrap();
        }
        seq.next_item().unwrap();

        let items = seq.cursor_items();
        assert_eq!(items.size_hint(), (2, Some(2)));
        assert_eq!(items.collect::<String>(), "bc");
        assert_eq!(seq.cursor(), 3);
    }

    #[test]
    fn test_non_copy_elements() {
        let mut seq = GrowableSequence::<String>::new(1).unwrap();
        seq.append("one".to_string()).unwrap();
        seq.append("two".to_string()).unwrap();
        assert_eq!(seq.next_item().unwrap(), "one");
        assert_eq!((&seq).into_iter().count(), 2);
    }
}
