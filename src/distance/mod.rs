//! Damerau-Levenshtein distance kernels.
//!
//! This module computes the optimal-string-alignment form of the
//! Damerau-Levenshtein distance over byte strings: insertions, deletions,
//! substitutions and transpositions of two adjacent bytes each cost one.
//!
//! Three memory layouts are available, all producing identical results:
//! - **Banded**: three diagonal-indexed rows restricted to `|i - j| <= k`,
//!   with early termination once a whole row exceeds the bound
//! - **Rows**: three full-width rows, no banding
//! - **Matrix**: the full `(n + 1) x (m + 1)` table, kept for cross-validation
//!
//! The free functions below allocate their own working memory and are meant
//! for one-off use. Hot loops should go through a
//! [`Session`](crate::session::Session), which reuses one
//! [`ScratchBuffer`](crate::scratch::ScratchBuffer) for every call.

mod banded;
mod full;

use crate::scratch::ScratchBuffer;

/// Memory layout used by a kernel invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Layout {
    /// Three rows of band width, indexed by diagonal offset.
    Banded,
    /// Three rows of `m + 1` cells, indexed by column.
    Rows,
    /// One `(n + 1) x (m + 1)` grid.
    Matrix,
}

impl Layout {
    /// Get a human-readable name for this layout
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Banded => "banded",
            Layout::Rows => "rows",
            Layout::Matrix => "matrix",
        }
    }

    /// Scratch cells needed to compare a string of length `n` against one of
    /// length `m` (`n <= m`) with effective bound `max`.
    ///
    /// Saturates instead of overflowing; an absurd request then fails in the
    /// allocator rather than wrapping around.
    pub fn required_cells(&self, n: usize, m: usize, max: usize) -> usize {
        match self {
            Layout::Banded => {
                let width = band_width(n, m, max);
                width.saturating_mul(3)
            }
            Layout::Rows => m.saturating_add(1).saturating_mul(3),
            Layout::Matrix => n.saturating_add(1).saturating_mul(m.saturating_add(1)),
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Width of the diagonal band for an `n x m` problem under bound `max`.
#[inline]
pub(crate) fn band_width(n: usize, m: usize, max: usize) -> usize {
    max.min(n) + max.min(m) + 1
}

/// Result of one kernel invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The distance, or `bound + 1` when the bound was exceeded.
    pub distance: usize,

    /// True when the kernel stopped before filling every row.
    pub terminated_early: bool,
}

impl Outcome {
    #[inline]
    fn exact(distance: usize) -> Self {
        Self {
            distance,
            terminated_early: false,
        }
    }

    #[inline]
    fn cut_short(distance: usize) -> Self {
        Self {
            distance,
            terminated_early: true,
        }
    }
}

/// Strip common prefix and suffix from two byte strings.
///
/// Returns the differing cores. Neither a shared prefix nor a shared suffix
/// can take part in an adjacent transposition, so the distance between the
/// cores equals the distance between the inputs.
#[inline]
pub fn strip_common_affixes<'a>(a: &'a [u8], b: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    let prefix_len = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix_len..], &b[prefix_len..]);

    let suffix_len = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    (&a[..a.len() - suffix_len], &b[..b.len() - suffix_len])
}

/// A kernel invocation that still needs scratch memory.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Job<'a> {
    layout: Layout,
    shorter: &'a [u8],
    longer: &'a [u8],
    max: usize,
    bound: Option<usize>,
}

/// What to do with a string pair after validation-free preprocessing.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Plan<'a> {
    /// Answer known without running a kernel.
    Resolved(Outcome),
    /// Kernel run required.
    Run(Job<'a>),
}

/// Preprocess a pair: optionally trim affixes, order by length, and settle
/// the degenerate cases (an empty side, or a length gap wider than the bound).
pub(crate) fn plan<'a>(
    layout: Layout,
    trim: bool,
    subject: &'a [u8],
    query: &'a [u8],
    bound: Option<usize>,
) -> Plan<'a> {
    let (a, b) = if trim {
        strip_common_affixes(subject, query)
    } else {
        (subject, query)
    };
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let gap = longer.len() - shorter.len();

    if let Some(k) = bound {
        if gap > k {
            return Plan::Resolved(Outcome::cut_short(k.saturating_add(1)));
        }
    }
    if shorter.is_empty() {
        return Plan::Resolved(Outcome::exact(gap));
    }

    // The distance never exceeds the longer length, so neither does the
    // useful part of any bound.
    let max = bound.map_or(longer.len(), |k| k.min(longer.len()));

    Plan::Run(Job {
        layout,
        shorter,
        longer,
        max,
        bound,
    })
}

impl<'a> Job<'a> {
    #[inline]
    pub(crate) fn required_cells(&self) -> usize {
        self.layout
            .required_cells(self.shorter.len(), self.longer.len(), self.max)
    }

    /// Run the kernel inside `cells`, which holds at least
    /// [`required_cells`](Self::required_cells) cells.
    pub(crate) fn run_in(&self, cells: &mut [usize]) -> Outcome {
        let (a, b) = (self.shorter, self.longer);
        let outcome = match self.layout {
            Layout::Banded => banded::distance(a, b, self.max, cells),
            Layout::Rows => Outcome::exact(full::row_distance(a, b, cells)),
            Layout::Matrix => Outcome::exact(full::matrix_distance(a, b, cells)),
        };

        match self.bound {
            Some(k) if outcome.distance > k => Outcome {
                distance: k.saturating_add(1),
                ..outcome
            },
            _ => outcome,
        }
    }

    /// Run the kernel in the session buffer. The buffer must already have
    /// been grown to [`required_cells`](Self::required_cells).
    #[inline]
    pub(crate) fn run(&self, scratch: &mut ScratchBuffer) -> Outcome {
        let required = self.required_cells();
        self.run_in(scratch.cells_mut(required))
    }
}

fn one_off(layout: Layout, trim: bool, a: &[u8], b: &[u8], bound: Option<usize>) -> usize {
    match plan(layout, trim, a, b, bound) {
        Plan::Resolved(outcome) => outcome.distance,
        Plan::Run(job) => {
            let mut cells = vec![0; job.required_cells()];
            job.run_in(&mut cells).distance
        }
    }
}

/// Compute the Damerau-Levenshtein distance between two byte strings.
///
/// # Example
///
/// ```rust
/// use damlev::distance::damerau_levenshtein;
///
/// assert_eq!(damerau_levenshtein(b"kitten", b"sitting"), 3);
/// assert_eq!(damerau_levenshtein(b"ab", b"ba"), 1);
/// ```
pub fn damerau_levenshtein(a: &[u8], b: &[u8]) -> usize {
    one_off(Layout::Banded, true, a, b, None)
}

/// Compute the distance, giving up once it is known to exceed `max`.
///
/// Returns `min(distance, max + 1)`. Only cells within `max` of the diagonal
/// are evaluated, so the work is `O((n + m) * max)`.
///
/// # Example
///
/// ```rust
/// use damlev::distance::damerau_levenshtein_bounded;
///
/// assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", 5), 3);
/// assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", 2), 3);
/// assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", 1), 2);
/// ```
pub fn damerau_levenshtein_bounded(a: &[u8], b: &[u8], max: usize) -> usize {
    one_off(Layout::Banded, true, a, b, Some(max))
}

/// Compute the distance with the full-width row layout.
pub fn damerau_levenshtein_rows(a: &[u8], b: &[u8]) -> usize {
    one_off(Layout::Rows, true, a, b, None)
}

/// Compute the distance over the full matrix, without affix trimming.
///
/// This is the reference implementation the other layouts are checked
/// against. It needs `(n + 1) * (m + 1)` cells.
pub fn damerau_levenshtein_matrix(a: &[u8], b: &[u8]) -> usize {
    one_off(Layout::Matrix, false, a, b, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(damerau_levenshtein(b"test", b"test"), 0);
        assert_eq!(damerau_levenshtein(b"", b""), 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(damerau_levenshtein(b"", b"test"), 4);
        assert_eq!(damerau_levenshtein(b"test", b""), 4);
        assert_eq!(damerau_levenshtein_bounded(b"", b"test", 2), 3);
        assert_eq!(damerau_levenshtein_bounded(b"test", b"", 4), 4);
    }

    #[test]
    fn test_single_edits() {
        assert_eq!(damerau_levenshtein(b"kitten", b"sitten"), 1);
        assert_eq!(damerau_levenshtein(b"abc", b"ab"), 1);
        assert_eq!(damerau_levenshtein(b"abc", b"abcd"), 1);
        assert_eq!(damerau_levenshtein(b"ab", b"ba"), 1);
    }

    #[test]
    fn test_basic() {
        assert_eq!(damerau_levenshtein(b"kitten", b"sitting"), 3);
        assert_eq!(damerau_levenshtein(b"saturday", b"sunday"), 3);
        assert_eq!(damerau_levenshtein(b"test", b"tset"), 1);
        assert_eq!(damerau_levenshtein(b"abc", b"acb"), 1);
    }

    #[test]
    fn test_restricted_transposition() {
        // Optimal string alignment never edits a transposed pair again.
        assert_eq!(damerau_levenshtein(b"ca", b"abc"), 3);
        assert_eq!(damerau_levenshtein_matrix(b"ca", b"abc"), 3);
    }

    #[test]
    fn test_layouts_agree() {
        let pairs: [(&[u8], &[u8]); 8] = [
            (b"", b""),
            (b"a", b"b"),
            (b"ab", b"ba"),
            (b"kitten", b"sitting"),
            (b"algorithm", b"altruistic"),
            (b"commonprefix_abc", b"commonprefix_def"),
            (b"abcdef", b"badcfe"),
            (b"Vladimir Levenshtein", b"Vladimir Iosifovich Levenshtein"),
        ];

        for (a, b) in pairs {
            let banded = damerau_levenshtein(a, b);
            assert_eq!(banded, damerau_levenshtein_rows(a, b), "{:?} vs {:?}", a, b);
            assert_eq!(banded, damerau_levenshtein_matrix(a, b), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_bounded_caps_at_bound_plus_one() {
        assert_eq!(damerau_levenshtein_bounded(b"aaaaaaaaaa", b"bbbbbbbbbb", 5), 6);
        assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", 3), 3);
        assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", 0), 1);
        assert_eq!(damerau_levenshtein_bounded(b"same", b"same", 0), 0);
    }

    #[test]
    fn test_bounded_length_gap() {
        assert_eq!(damerau_levenshtein_bounded(b"a", b"abcdefgh", 3), 4);
    }

    #[test]
    fn test_huge_bound_does_not_overflow() {
        assert_eq!(damerau_levenshtein_bounded(b"kitten", b"sitting", usize::MAX), 3);
        assert_eq!(damerau_levenshtein_bounded(b"", b"abc", usize::MAX), 3);
    }

    #[test]
    fn test_strip_common_affixes() {
        assert_eq!(
            strip_common_affixes(b"commonprefix_abc", b"commonprefix_def"),
            (&b"abc"[..], &b"def"[..])
        );
        assert_eq!(
            strip_common_affixes(b"abc_suffix", b"xyz_suffix"),
            (&b"abc"[..], &b"xyz"[..])
        );
        assert_eq!(strip_common_affixes(b"abc", b"abcd"), (&b""[..], &b"d"[..]));
        assert_eq!(strip_common_affixes(b"same", b"same"), (&b""[..], &b""[..]));
        // Overlapping prefix and suffix candidates must not double count.
        assert_eq!(strip_common_affixes(b"aa", b"aaa"), (&b""[..], &b"a"[..]));
    }

    #[test]
    fn test_plan_resolves_degenerate_pairs() {
        match plan(Layout::Banded, true, b"abc", b"abc", None) {
            Plan::Resolved(outcome) => assert_eq!(outcome, Outcome::exact(0)),
            Plan::Run(_) => panic!("identical strings should not need a kernel"),
        }
        match plan(Layout::Banded, true, b"ab", b"abcdef", Some(2)) {
            Plan::Resolved(outcome) => assert_eq!(outcome, Outcome::cut_short(3)),
            Plan::Run(_) => panic!("length gap beyond bound should short circuit"),
        }
    }

    #[test]
    fn test_required_cells() {
        assert_eq!(Layout::Banded.required_cells(4, 6, 2), 3 * 5);
        assert_eq!(Layout::Banded.required_cells(4, 6, 6), 3 * 11);
        assert_eq!(Layout::Rows.required_cells(4, 6, 2), 21);
        assert_eq!(Layout::Matrix.required_cells(4, 6, 2), 35);
        assert_eq!(Layout::Matrix.required_cells(usize::MAX, 6, 2), usize::MAX);
    }
}
