//! Error types for distance evaluation.

use thiserror::Error;

use crate::session::SessionState;

/// Errors that can occur while evaluating a distance through a [`Session`].
///
/// A failed call never yields a number: every error path is reported as one
/// of these variants so a caller cannot mistake it for a measured distance.
///
/// [`Session`]: crate::session::Session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DistanceError {
    /// An argument was out of range or of the wrong kind for the variant.
    ///
    /// Raised for a negative maximum distance, a percentage outside `[0, 1)`,
    /// or a bound passed to a variant that does not take one (and vice versa).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The scratch buffer could not grow to the size a call requires.
    ///
    /// Either the allocator refused the request or the request exceeded the
    /// session's configured ceiling. The session keeps its previous buffer.
    #[error("Failed to allocate {requested} scratch cells: {reason}")]
    AllocationError {
        /// Number of cells the call needed.
        requested: usize,
        /// Why the allocation was refused.
        reason: String,
    },

    /// The session is not in the `Ready` state.
    #[error("Session is {state}, expected ready")]
    InvalidState {
        /// State the session was in when the call was made.
        state: SessionState,
    },
}

impl DistanceError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        DistanceError::InvalidArgument(message.into())
    }
}

/// A specialized `Result` type for distance evaluation.
pub type Result<T> = std::result::Result<T, DistanceError>;
