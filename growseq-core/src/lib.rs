//! Growable, append-only sequences with validated handles.
//!
//! This crate provides a resizable container that allocates its storage up
//! front, doubles it when an append finds it full, and hands elements back
//! through a single forward cursor. Every operation checks that the instance
//! is still live, and failures are reported through a closed set of codes
//! with fixed diagnostic strings.
//!
//! - [`GrowableSequence`]: typed sequence of `T`
//! - [`RawSequence`]: byte sequence with a runtime element size
//! - [`SequenceHandle`]: nullable slot with validate/destroy semantics
//! - [`SharedSequence`]: mutex-guarded handle for use across threads
//! - [`ErrorCode`], [`SeqError`], [`error_string`]: status reporting

pub mod config;
pub mod error;
pub mod handle;
#[cfg(feature = "logging")]
pub mod logger;
pub mod raw;
pub mod sequence;
pub mod shared;
mod storage;

// Re-export commonly used error types
pub use error::{ConfigError, ConfigResult, ErrorCode, SeqError, SeqResult, error_string};

pub use config::SequenceConfig;
pub use handle::SequenceHandle;
pub use raw::RawSequence;
pub use sequence::{CursorItems, GrowableSequence, capacity_after, grown_capacity};
pub use shared::SharedSequence;
