//! Externally serialized access to one sequence from several owners.
//!
//! [`GrowableSequence`](crate::GrowableSequence) does no locking of its own.
//! [`SharedSequence`] puts the whole handle behind one mutex, so each call
//! (including a complete cursor traversal) runs under a single lock
//! acquisition.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{config::SequenceConfig, error::SeqResult, handle::SequenceHandle};

/// Cloneable, mutex-guarded handle to a sequence.
#[derive(Debug)]
pub struct SharedSequence<T> {
    inner: Arc<Mutex<SequenceHandle<T>>>,
}

impl<T> Clone for SharedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> SharedSequence<T> {
    /// Construct a sequence and share it.
    pub fn new(initial_capacity: usize) -> SeqResult<Self> {
        SequenceHandle::construct(initial_capacity).map(Self::from_handle)
    }

    pub fn with_config(config: &SequenceConfig) -> SeqResult<Self> {
        SequenceHandle::with_config(config).map(Self::from_handle)
    }

    pub fn from_handle(handle: SequenceHandle<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(handle)),
        }
    }

    /// Run `f` with exclusive access to the handle.
    pub fn with<R>(&self, f: impl FnOnce(&mut SequenceHandle<T>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn validate(&self) -> SeqResult<()> {
        self.with(|handle| handle.validate())
    }

    pub fn append(&self, item: T) -> SeqResult<()> {
        self.with(|handle| handle.append(item))
    }

    pub fn clear(&self) -> SeqResult<()> {
        self.with(|handle| handle.clear())
    }

    /// Destroy the sequence for every clone of this handle.
    pub fn destroy(&self) -> SeqResult<()> {
        self.with(|handle| handle.destroy())
    }

    pub fn len(&self) -> SeqResult<usize> {
        self.with(|handle| handle.get().map(|seq| seq.len()))
    }

    pub fn is_empty(&self) -> SeqResult<bool> {
        self.len().map(|len| len == 0)
    }
}

impl<T: Clone> SharedSequence<T> {
    /// Reset the cursor and visit every element in insertion order while
    /// holding the lock. Returns the number of elements visited.
    pub fn traverse(&self, mut visit: impl FnMut(&T)) -> SeqResult<usize> {
        self.with(|handle| {
            let seq = handle.get_mut()?;
            seq.reset_cursor()?;
            let mut visited = 0;
            for item in seq.cursor_items() {
                visit(&item);
                visited += 1;
            }
            Ok(visited)
        })
    }

    /// Copy every element out in insertion order.
    pub fn snapshot(&self) -> SeqResult<Vec<T>> {
        self.with(|handle| handle.get().map(|seq| seq.as_slice().to_vec()))
    }
}
