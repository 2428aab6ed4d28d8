//! Reusable working memory for the distance kernels.
//!
//! A [`ScratchBuffer`] is allocated once when a session is set up and then
//! handed to every kernel invocation in that session. It only ever grows, so
//! after the first few calls of a batch the hot path performs no allocation at
//! all.
//!
//! # Layout
//!
//! The buffer is a flat run of `usize` cells. The row kernels carve it into
//! three equally sized rows (two-ago, previous, current); the matrix kernel
//! uses it as one `(n + 1) x (m + 1)` grid in row-major order. See
//! [`Layout`](crate::distance::Layout).
//!
//! # Thread Safety
//!
//! ScratchBuffer is NOT shared. Each session owns exactly one; parallel
//! workers each set up their own session.

use std::collections::TryReserveError;

use crate::error::{DistanceError, Result};

/// Grow-only scratch storage owned by a single session.
#[derive(Debug)]
pub struct ScratchBuffer {
    /// Initialized cells; `cells.len()` is the usable capacity.
    cells: Vec<usize>,

    /// Hard ceiling on the number of cells, if configured.
    max_capacity: Option<usize>,

    /// Statistics: number of times the buffer grew after creation.
    growths: usize,
}

impl ScratchBuffer {
    /// Default number of cells allocated at setup.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Allocate a buffer with `capacity` cells.
    ///
    /// Fails with [`DistanceError::AllocationError`] if the allocator refuses
    /// the request or `capacity` exceeds `max_capacity`.
    pub fn with_capacity(capacity: usize, max_capacity: Option<usize>) -> Result<Self> {
        let mut buffer = Self {
            cells: Vec::new(),
            max_capacity,
            growths: 0,
        };
        buffer.grow_to(capacity)?;
        Ok(buffer)
    }

    /// Number of cells currently available without reallocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Configured ceiling, if any.
    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Number of growths since the buffer was created.
    pub fn growths(&self) -> usize {
        self.growths
    }

    /// Make sure at least `required` cells are available.
    ///
    /// Returns `true` if the buffer had to grow. On failure the existing
    /// cells are left untouched, so the buffer stays usable for smaller
    /// requests.
    #[inline]
    pub fn ensure(&mut self, required: usize) -> Result<bool> {
        if required <= self.cells.len() {
            return Ok(false);
        }
        self.grow_to(required)?;
        self.growths += 1;
        Ok(true)
    }

    fn grow_to(&mut self, required: usize) -> Result<()> {
        if let Some(ceiling) = self.max_capacity {
            if required > ceiling {
                return Err(DistanceError::AllocationError {
                    requested: required,
                    reason: format!("exceeds ceiling of {} cells", ceiling),
                });
            }
        }

        let additional = required - self.cells.len();
        self.cells
            .try_reserve_exact(additional)
            .map_err(|err: TryReserveError| DistanceError::AllocationError {
                requested: required,
                reason: err.to_string(),
            })?;
        self.cells.resize(required, 0);
        Ok(())
    }

    /// Borrow the first `len` cells.
    ///
    /// The caller must have called [`ensure`](Self::ensure) with at least
    /// `len` beforehand. Contents are whatever the previous call left behind;
    /// kernels overwrite every cell before reading it.
    #[inline]
    pub(crate) fn cells_mut(&mut self, len: usize) -> &mut [usize] {
        &mut self.cells[..len]
    }

    /// Free the storage. The buffer reports zero capacity afterwards.
    pub fn release(&mut self) {
        self.cells = Vec::new();
    }
}
