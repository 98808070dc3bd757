//! Byte-level growable sequence with a runtime element size.
//!
//! [`RawSequence`] is the element-type-agnostic form of
//! [`GrowableSequence`](crate::GrowableSequence): every element is an opaque
//! run of `element_size` bytes and the caller decides what those bytes mean.
//! Growth, cursor and lifecycle rules are the same as for the typed form.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::{
    config::SequenceConfig,
    error::{SeqError, SeqResult, report},
    sequence::{DEAD_SIGNATURE, LIVE_SIGNATURE, grown_capacity},
    storage::Storage,
};

/// Append-only sequence of fixed-size byte elements.
#[derive(Debug)]
pub struct RawSequence {
    signature: u32,
    element_size: NonZeroUsize,
    storage: Storage<u8>,
    cursor: usize,
    max_storage_bytes: Option<usize>,
}

impl RawSequence {
    /// Construct a sequence of `element_size`-byte elements with room for
    /// `initial_capacity` of them.
    pub fn new(element_size: NonZeroUsize, initial_capacity: usize) -> SeqResult<Self> {
        Self::with_config(
            element_size,
            &SequenceConfig::default().with_initial_capacity(initial_capacity),
        )
    }

    /// Construct a sequence of `element_size`-byte elements from `config`.
    pub fn with_config(element_size: NonZeroUsize, config: &SequenceConfig) -> SeqResult<Self> {
        let storage = report(
            "new",
            Self::allocate(element_size, config.initial_capacity, config.max_storage_bytes),
        )?;
        debug!(
            capacity = config.initial_capacity,
            element_size = element_size.get(),
            "raw sequence constructed"
        );

        Ok(Self {
            signature: LIVE_SIGNATURE,
            element_size,
            storage,
            cursor: 0,
            max_storage_bytes: config.max_storage_bytes,
        })
    }

    fn allocate(
        element_size: NonZeroUsize,
        capacity: usize,
        max_bytes: Option<usize>,
    ) -> SeqResult<Storage<u8>> {
        let bytes = capacity
            .checked_mul(element_size.get())
            .ok_or(SeqError::AllocationFailed)?;
        Storage::allocate(bytes, max_bytes)
    }

    /// Check that this instance is live.
    pub fn validate(&self) -> SeqResult<()> {
        if self.signature == LIVE_SIGNATURE {
            Ok(())
        } else {
            Err(SeqError::InvalidSignature)
        }
    }

    /// Copy one element into the next free slot, growing storage first if
    /// full.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is live and `element.len()` differs from the
    /// element size.
    pub fn append(&mut self, element: &[u8]) -> SeqResult<()> {
        report("append", self.try_append(element))
    }

    fn try_append(&mut self, element: &[u8]) -> SeqResult<()> {
        self.validate()?;
        assert_eq!(
            element.len(),
            self.element_size.get(),
            "element length does not match element size"
        );

        if self.storage.is_full() {
            let new_capacity = grown_capacity(self.capacity()).ok_or(SeqError::AllocationFailed)?;
            let new_bytes = new_capacity
                .checked_mul(self.element_size.get())
                .ok_or(SeqError::AllocationFailed)?;
            self.storage.grow_to(new_bytes, self.max_storage_bytes)?;
        }

        self.storage.extend_from_slice(element);
        Ok(())
    }

    /// Rewind the cursor to the first element.
    pub fn reset_cursor(&mut self) -> SeqResult<()> {
        report("reset_cursor", self.validate())?;
        self.cursor = 0;
        Ok(())
    }

    /// Copy the element under the cursor into `dest` and advance.
    ///
    /// On [`SeqError::EndOfSequence`] nothing is written and the cursor does
    /// not move.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is live and `dest.len()` differs from the
    /// element size.
    pub fn next_into(&mut self, dest: &mut [u8]) -> SeqResult<()> {
        report("next_into", self.try_next_into(dest))
    }

    fn try_next_into(&mut self, dest: &mut [u8]) -> SeqResult<()> {
        self.validate()?;
        assert_eq!(
            dest.len(),
            self.element_size.get(),
            "destination length does not match element size"
        );
        let element = self.get(self.cursor).ok_or(SeqError::EndOfSequence)?;
        dest.copy_from_slice(element);
        self.cursor += 1;
        Ok(())
    }

    /// Drop every element, keeping the capacity.
    ///
    /// The replacement buffer is allocated before the old one is released,
    /// so a failed clear leaves the sequence unchanged.
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
    pub fn destroy(&mut self) -> SeqResult<()> {
        report("destroy", self.validate())?;
        self.signature = DEAD_SIGNATURE;
        self.storage = Storage::released();
        self.cursor = 0;
        debug!("raw sequence destroyed");
        Ok(())
    }

    /// Element at `index`, if stored.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let size = self.element_size.get();
        let start = index.checked_mul(size)?;
        self.storage.as_slice().get(start..start.checked_add(size)?)
    }

    /// Stored elements in insertion order.
    pub fn elements(&self) -> std::slice::ChunksExact<'_, u8> {
        self.storage.as_slice().chunks_exact(self.element_size.get())
    }

    pub fn len(&self) -> usize {
        self.storage.len() / self.element_size.get()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity() / self.element_size.get()
    }

    pub fn element_size(&self) -> usize {
        self.element_size.get()
    }

    pub fn storage_bytes(&self) -> usize {
        self.storage.bytes()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Stored bytes, `len() * element_size()` of them.
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_slice()
    }

    #[cfg(test)]
    pub(crate) fn overwrite_signature(&mut self, signature: u32) {
        self.signature = signature;
    }
}
