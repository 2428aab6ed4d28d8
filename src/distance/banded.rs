//! Banded kernel with early termination.
//!
//! Cell `D[i][j]` lives at offset `d = j - i + lower` of its row, where
//! `lower = min(max, n)`. With that indexing the four predecessors of a cell
//! sit at fixed offsets:
//!
//! ```text
//! D[i-1][j-1]  ->  prev[d]       (match / substitution)
//! D[i][j-1]    ->  curr[d - 1]   (insertion)
//! D[i-1][j]    ->  prev[d + 1]   (deletion)
//! D[i-2][j-2]  ->  two_ago[d]    (transposition)
//! ```
//!
//! Every value is clamped to `cap = max + 1`, which also stands in for the
//! cells outside the band. Clamping commutes with `min` and with adding a
//! non-negative cost, so the final cell equals `min(distance, cap)`.

use super::{band_width, Outcome};

/// Distance between `a` and `b` (`a.len() <= b.len()`, `a` non-empty,
/// `b.len() - a.len() <= max`), capped at `max + 1`.
///
/// `cells` must hold at least `3 * band_width(n, m, max)` cells. Every cell
/// that is read is written earlier in the same call.
pub(super) fn distance(a: &[u8], b: &[u8], max: usize, cells: &mut [usize]) -> Outcome {
    let n = a.len();
    let m = b.len();
    debug_assert!(n > 0 && n <= m && m - n <= max);

    let cap = max + 1;
    let lower = max.min(n);
    let width = band_width(n, m, max);

    let (mut two_ago, rest) = cells[..3 * width].split_at_mut(width);
    let (mut prev, mut curr) = rest.split_at_mut(width);

    // Row 0: D[0][j] = j for the columns the band reaches.
    two_ago.fill(cap);
    for (d, cell) in prev.iter_mut().enumerate() {
        *cell = if d >= lower { (d - lower).min(cap) } else { cap };
    }

    for i in 1..=n {
        let mut row_min = cap;

        for d in 0..width {
            // j = i + d - lower, outside [0, m] means no such column.
            let value = match (i + d).checked_sub(lower) {
                None => cap,
                Some(j) if j > m => cap,
                Some(0) => i.min(cap),
                Some(j) => {
                    let cost = usize::from(a[i - 1] != b[j - 1]);

                    let mut best = prev[d] + cost;
                    if d > 0 && curr[d - 1] + 1 < best {
                        best = curr[d - 1] + 1;
                    }
                    if d + 1 < width && prev[d + 1] + 1 < best {
                        best = prev[d + 1] + 1;
                    }
                    if i > 1
                        && j > 1
                        && a[i - 1] == b[j - 2]
                        && a[i - 2] == b[j - 1]
                        && two_ago[d] + cost < best
                    {
                        best = two_ago[d] + cost;
                    }

                    best.min(cap)
                }
            };

            curr[d] = value;
            row_min = row_min.min(value);
        }

        // Row minima never decrease, so nothing later can come back in range.
        if row_min > max {
            return Outcome {
                distance: cap,
                terminated_early: i < n,
            };
        }

        std::mem::swap(&mut two_ago, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    Outcome {
        distance: prev[m - n + lower],
        terminated_early: false,
    }
}
