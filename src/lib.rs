//! # damlev
//!
//! Damerau-Levenshtein edit distance for database-scale workloads.
//!
//! The distance is the optimal-string-alignment form: insertions, deletions,
//! substitutions and transpositions of two adjacent bytes each cost one. The
//! kernel evaluates only the diagonal band a bound allows and stops as soon
//! as a whole row exceeds it, so `WHERE distance(a, b) <= k` filters touch
//! `O((n + m) * k)` cells per row instead of `O(n * m)`.
//!
//! Working memory lives in a [`Session`](session::Session) that is set up once
//! per batch of calls and grows only when a longer pair comes along.
//!
//! ## Example
//!
//! ```rust
//! use damlev::prelude::*;
//!
//! let mut session = damlev::session::setup()?;
//!
//! assert_eq!(session.evaluate(Variant::Classic, b"ab", b"ba", Bound::None)?, 1);
//!
//! // Distance 10 exceeds the derived bound of 5, so the sentinel 6 comes back.
//! let capped = session.evaluate(
//!     Variant::PercentageBounded,
//!     b"aaaaaaaaaa",
//!     b"bbbbbbbbbb",
//!     Bound::Percent(0.5),
//! )?;
//! assert_eq!(capped, 6);
//!
//! session.teardown();
//! # Ok::<(), damlev::error::DistanceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod distance;
pub mod error;
pub mod scratch;
pub mod session;
pub mod variant;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::distance::{
        damerau_levenshtein, damerau_levenshtein_bounded, damerau_levenshtein_matrix,
        damerau_levenshtein_rows, Layout,
    };
    pub use crate::error::DistanceError;
    pub use crate::session::{Session, SessionState, SessionStats};
    pub use crate::variant::{Bound, BoundKind, Variant};
}
