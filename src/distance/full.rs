//! Unbanded kernels: full-width rows and the full matrix.

/// Three rows of `m + 1` cells, indexed by column.
///
/// `cells` must hold at least `3 * (m + 1)` cells.
pub(super) fn row_distance(a: &[u8], b: &[u8], cells: &mut [usize]) -> usize {
    let n = a.len();
    let m = b.len();
    let width = m + 1;

    let (mut two_ago, rest) = cells[..3 * width].split_at_mut(width);
    let (mut prev_row, mut curr_row) = rest.split_at_mut(width);

    for (j, item) in prev_row.iter_mut().enumerate() {
        *item = j;
    }

    for i in 1..=n {
        curr_row[0] = i;

        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);

            let mut best = prev_row[j - 1] + cost; // substitution
            if curr_row[j - 1] + 1 < best {
                best = curr_row[j - 1] + 1; // insertion
            }
            if prev_row[j] + 1 < best {
                best = prev_row[j] + 1; // deletion
            }
            if i > 1
                && j > 1
                && a[i - 1] == b[j - 2]
                && a[i - 2] == b[j - 1]
                && two_ago[j - 2] + cost < best
            {
                best = two_ago[j - 2] + cost;
            }

            curr_row[j] = best;
        }

        // Rotate rows
        std::mem::swap(&mut two_ago, &mut prev_row);
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[m]
}

/// The whole `(n + 1) x (m + 1)` table in row-major order.
///
/// `cells` must hold at least `(n + 1) * (m + 1)` cells.
pub(super) fn matrix_distance(a: &[u8], b: &[u8], cells: &mut [usize]) -> usize {
    let n = a.len();
    let m = b.len();
    let stride = m + 1;
    let idx = |i: usize, j: usize| i * stride + j;

    let grid = &mut cells[..(n + 1) * stride];
    fill_matrix(a, b, grid);
    grid[idx(n, m)]
}

fn fill_matrix(a: &[u8], b: &[u8], grid: &mut [usize]) {
    let n = a.len();
    let m = b.len();
    let stride = m + 1;
    let idx = |i: usize, j: usize| i * stride + j;

    for i in 0..=n {
        grid[idx(i, 0)] = i;
    }
    for j in 0..=m {
        grid[idx(0, j)] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);

            let mut best = grid[idx(i - 1, j - 1)] + cost;
            best = best.min(grid[idx(i, j - 1)] + 1);
            best = best.min(grid[idx(i - 1, j)] + 1);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(grid[idx(i - 2, j - 2)] + cost);
            }

            grid[idx(i, j)] = best;
        }
    }
}
