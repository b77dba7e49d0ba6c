//! Error types for lazy-value operations.
//!
//! Scalar conversions stay total (they have no failure mode once the caller
//! has checked the kind); everything that depends on scanner boundaries
//! reports failure through [`Result`] instead of producing a partially
//! initialized container.

use crate::kind::JsonKind;

/// Result type alias for rawjson operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rawjson operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The aligned allocator could not satisfy a request.
    #[error("allocation of {size} bytes aligned to {align} failed")]
    AllocationFailure {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// The scanner ran into text that does not form a complete, well-nested
    /// JSON value before the end of the buffer.
    #[error("malformed JSON value at byte {position}: {message}")]
    MalformedValue {
        /// Byte offset where scanning gave up.
        position: usize,
        /// Error description.
        message: &'static str,
    },

    /// A structural conversion was invoked on text of the wrong kind.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Kind the conversion requires.
        expected: JsonKind,
        /// Kind discriminated from the text.
        found: JsonKind,
    },
}

impl Error {
    /// Create a malformed-value error.
    #[inline]
    pub(crate) fn malformed(position: usize, message: &'static str) -> Self {
        Self::MalformedValue { position, message }
    }
}
