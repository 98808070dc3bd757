//! Nullable handle slot around a [`GrowableSequence`].
//!
//! A handle is either empty or holds a sequence. Operations on an empty
//! handle fail with [`SeqError::InvalidObject`]; [`SequenceHandle::destroy`]
//! tears the sequence down and leaves the handle empty again.

use crate::{
    config::SequenceConfig,
    error::{SeqError, SeqResult, report},
    sequence::GrowableSequence,
};

/// An owned, possibly empty reference to a [`GrowableSequence`].
#[derive(Debug)]
pub struct SequenceHandle<T>(Option<GrowableSequence<T>>);

impl<T> SequenceHandle<T> {
    /// An empty handle.
    pub const fn null() -> Self {
        Self(None)
    }

    /// Construct a sequence and return a handle to it.
    pub fn construct(initial_capacity: usize) -> SeqResult<Self> {
        GrowableSequence::new(initial_capacity).map(Self::from)
    }

    /// Construct a sequence from `config` and return a handle to it.
    pub fn with_config(config: &SequenceConfig) -> SeqResult<Self> {
        GrowableSequence::with_config(config).map(Self::from)
    }

    /// Returns true if the handle holds no sequence.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Check that the handle refers to a live sequence.
    ///
    /// # Errors
    ///
    /// - [`SeqError::InvalidObject`] if the handle is empty.
    /// - [`SeqError::InvalidSignature`] if the sequence was destroyed or its
    ///   signature is corrupted.
    pub fn validate(&self) -> SeqResult<()> {
        self.get().map(|_| ())
    }

    /// Borrow the live sequence.
    pub fn get(&self) -> SeqResult<&GrowableSequence<T>> {
        report("validate", self.live())
    }

    /// Mutably borrow the live sequence.
    pub fn get_mut(&mut self) -> SeqResult<&mut GrowableSequence<T>> {
        self.live_mut_for("validate")
    }

    fn live(&self) -> SeqResult<&GrowableSequence<T>> {
        let seq = self.0.as_ref().ok_or(SeqError::InvalidObject)?;
        seq.validate()?;
        Ok(seq)
    }

    /// Like [`get_mut`](Self::get_mut), but a failure is logged against `op`.
    fn live_mut_for(&mut self, op: &'static str) -> SeqResult<&mut GrowableSequence<T>> {
        let seq = match self.0.as_mut() {
            Some(seq) => seq.validate().map(|()| seq),
            None => Err(SeqError::InvalidObject),
        };
        report(op, seq)
    }

    /// See [`GrowableSequence::append`].
    pub fn append(&mut self, item: T) -> SeqResult<()> {
        self.live_mut_for("append")?.append(item)
    }

    /// See [`GrowableSequence::reset_cursor`].
    pub fn reset_cursor(&mut self) -> SeqResult<()> {
        self.live_mut_for("reset_cursor")?.reset_cursor()
    }

    /// See [`GrowableSequence::clear`].
    pub fn clear(&mut self) -> SeqResult<()> {
        self.live_mut_for("clear")?.clear()
    }

    /// Destroy the sequence and empty the handle.
    ///
    /// # Errors
    ///
    /// [`SeqError::InvalidObject`] if the handle is already empty; the
    /// handle is left as it was on any failure.
    pub fn destroy(&mut self) -> SeqResult<()> {
        self.live_mut_for("destroy")?.destroy()?;
        self.0 = None;
        Ok(())
    }

    /// Take the sequence out, leaving the handle empty.
    pub fn take(&mut self) -> Option<GrowableSequence<T>> {
        self.0.take()
    }

    pub fn into_inner(self) -> Option<GrowableSequence<T>> {
        self.0
    }
}

impl<T: Clone> SequenceHandle<T> {
    /// See [`GrowableSequence::next_item`].
    pub fn next_item(&mut self) -> SeqResult<T> {
        self.live_mut_for("next_item")?.next_item()
    }
}

impl<T> Default for SequenceHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<GrowableSequence<T>> for SequenceHandle<T> {
    fn from(seq: GrowableSequence<T>) -> Self {
        Self(Some(seq))
    }
}
