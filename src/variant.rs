//! Named distance profiles.
//!
//! A [`Variant`] is not a separate algorithm: every profile runs the same
//! recurrence and differs only in memory layout, in how its bound argument is
//! interpreted, and in whether common affixes are trimmed first.

use crate::distance::Layout;
use crate::error::{DistanceError, Result};

/// Distance profile selected for an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Default)]
pub enum Variant {
    /// Unbounded distance on the banded row layout.
    #[default]
    Classic,

    /// Unbounded distance on full-width rows.
    ///
    /// Same result as [`Classic`](Variant::Classic); kept as the reference
    /// point for layout performance comparisons.
    Reduced1D,

    /// Unbounded distance on the full matrix, without affix trimming.
    ///
    /// Needs `(n + 1) * (m + 1)` cells. Meant for cross-validation and short
    /// strings, not production scale.
    Full2D,

    /// Banded distance capped at `max + 1`.
    Bounded,

    /// Same contract as [`Bounded`](Variant::Bounded).
    ///
    /// Intended for scanning a candidate set where the caller keeps the
    /// smallest result and feeds it back as the next bound. The evaluation
    /// itself keeps no state between calls.
    BoundedMin,

    /// Bounded, with the bound given as a fraction of the longer input.
    ///
    /// The effective bound is `floor(p * max(n, m))` for `p` in `[0, 1)`.
    PercentageBounded,

    /// Returns [`Variant::NO_OP_RESULT`] without touching the kernel.
    ///
    /// Measures dispatch overhead in isolation.
    NoOp,
}

/// Kind of bound argument a variant takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// No bound argument.
    None,
    /// A non-negative integer distance.
    Distance,
    /// A fraction in `[0, 1)`.
    Percent,
    /// Anything, ignored.
    Any,
}

/// Bound argument supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bound {
    /// No bound.
    #[default]
    None,
    /// Maximum edit distance. Must be non-negative.
    Distance(i64),
    /// Maximum distance as a fraction of the longer input, in `[0, 1)`.
    Percent(f64),
}

impl From<i64> for Bound {
    fn from(max: i64) -> Self {
        Bound::Distance(max)
    }
}

impl From<f64> for Bound {
    fn from(percent: f64) -> Self {
        Bound::Percent(percent)
    }
}

impl Variant {
    /// Value returned by [`Variant::NoOp`].
    pub const NO_OP_RESULT: usize = 0;

    /// Every variant, in declaration order.
    pub const ALL: [Variant; 7] = [
        Variant::Classic,
        Variant::Reduced1D,
        Variant::Full2D,
        Variant::Bounded,
        Variant::BoundedMin,
        Variant::PercentageBounded,
        Variant::NoOp,
    ];

    /// Get a human-readable name for this variant
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Reduced1D => "reduced-1d",
            Variant::Full2D => "full-2d",
            Variant::Bounded => "bounded",
            Variant::BoundedMin => "bounded-min",
            Variant::PercentageBounded => "percentage-bounded",
            Variant::NoOp => "no-op",
        }
    }

    /// Memory layout the kernel runs in, or `None` for [`Variant::NoOp`].
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Variant::Classic
            | Variant::Bounded
            | Variant::BoundedMin
            | Variant::PercentageBounded => Some(Layout::Banded),
            Variant::Reduced1D => Some(Layout::Rows),
            Variant::Full2D => Some(Layout::Matrix),
            Variant::NoOp => None,
        }
    }

    /// Kind of bound argument this variant requires.
    pub fn bound_kind(&self) -> BoundKind {
        match self {
            Variant::Classic | Variant::Reduced1D | Variant::Full2D => BoundKind::None,
            Variant::Bounded | Variant::BoundedMin => BoundKind::Distance,
            Variant::PercentageBounded => BoundKind::Percent,
            Variant::NoOp => BoundKind::Any,
        }
    }

    /// Check if common prefix and suffix are stripped before the kernel runs
    pub fn trims_affixes(&self) -> bool {
        !matches!(self, Variant::Full2D | Variant::NoOp)
    }

    /// Validate `bound` for this variant and turn it into an integer bound.
    ///
    /// `subject_len` and `query_len` are the untrimmed input lengths, used
    /// to scale a percentage.
    pub fn resolve_bound(
        &self,
        bound: Bound,
        subject_len: usize,
        query_len: usize,
    ) -> Result<Option<usize>> {
        match (self.bound_kind(), bound) {
            (BoundKind::Any, _) | (BoundKind::None, Bound::None) => Ok(None),
            (BoundKind::Distance, Bound::Distance(max)) => {
                if max < 0 {
                    return Err(DistanceError::invalid_argument(format!(
                        "max distance must be non-negative, got {}",
                        max
                    )));
                }
                // A bound past usize::MAX bounds nothing.
                Ok(Some(usize::try_from(max).unwrap_or(usize::MAX)))
            }
            (BoundKind::Percent, Bound::Percent(percent)) => {
                if !(0.0..1.0).contains(&percent) {
                    return Err(DistanceError::invalid_argument(format!(
                        "max percentage must be in [0, 1), got {}",
                        percent
                    )));
                }
                let longest = subject_len.max(query_len);
                Ok(Some((percent * longest as f64).floor() as usize))
            }
            (expected, given) => Err(DistanceError::invalid_argument(format!(
                "{} expects {}, got {:?}",
                self.name(),
                expected.describe(),
                given
            ))),
        }
    }
}

impl BoundKind {
    fn describe(&self) -> &'static str {
        match self {
            BoundKind::None => "no bound",
            BoundKind::Distance => "an integer max distance",
            BoundKind::Percent => "a max percentage",
            BoundKind::Any => "any bound",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "damlev" => Ok(Variant::Classic),
            "reduced-1d" | "reduced" | "1d" => Ok(Variant::Reduced1D),
            "full-2d" | "full" | "2d" => Ok(Variant::Full2D),
            "bounded" | "damlevlim" | "damlevconst" => Ok(Variant::Bounded),
            "bounded-min" | "damlevmin" | "damlevconstmin" => Ok(Variant::BoundedMin),
            "percentage-bounded" | "percentage" | "damlevp" => Ok(Variant::PercentageBounded),
            "no-op" | "noop" => Ok(Variant::NoOp),
            _ => Err(format!(
                "Unknown variant: {}. Valid options: classic, reduced-1d, full-2d, bounded, \
                 bounded-min, percentage-bounded, no-op",
                s
            )),
        }
    }
}
