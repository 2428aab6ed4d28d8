//! Session lifecycle.
//!
//! A [`Session`] owns one [`ScratchBuffer`] for a whole batch of evaluations,
//! typically one query execution in the host database. The buffer is
//! allocated by [`Session::setup`], reused and grown by every
//! [`Session::evaluate`], and freed by [`Session::teardown`].
//!
//! ```text
//! Uninitialized --setup--> Ready --evaluate--> Ready --teardown--> TornDown
//! ```
//!
//! # Thread Safety
//!
//! Every operation takes `&mut self`, so one session can never be used from
//! two threads at once without external locking. Do not add such locking:
//! parallel workers should each set up their own session.
//!
//! # Example
//!
//! ```rust
//! use damlev::prelude::*;
//!
//! let mut session = damlev::session::setup()?;
//! assert_eq!(session.evaluate(Variant::Classic, b"kitten", b"sitting", Bound::None)?, 3);
//! assert_eq!(session.evaluate(Variant::Bounded, b"kitten", b"sitting", Bound::Distance(2))?, 3);
//! session.teardown();
//! # Ok::<(), damlev::error::DistanceError>(())
//! ```

use tracing::{debug, trace, warn};

use crate::config::SessionConfig;
use crate::distance::{self, Plan};
use crate::error::{DistanceError, Result};
use crate::scratch::ScratchBuffer;
use crate::variant::{Bound, Variant};

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created but not set up.
    Uninitialized,
    /// Buffer allocated; evaluations allowed.
    Ready,
    /// Buffer released; no further evaluations.
    TornDown,
}

impl SessionState {
    /// Get a human-readable name for this state
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Ready => "ready",
            SessionState::TornDown => "torn down",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
enum Slot {
    Uninitialized,
    Ready(ScratchBuffer),
    TornDown,
}

impl Slot {
    fn state(&self) -> SessionState {
        match self {
            Slot::Uninitialized => SessionState::Uninitialized,
            Slot::Ready(_) => SessionState::Ready,
            Slot::TornDown => SessionState::TornDown,
        }
    }
}

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Successful evaluations.
    pub evaluations: usize,

    /// Evaluations that stopped before the last row because the bound was
    /// already exceeded (including length-gap short circuits).
    pub early_exits: usize,

    /// Times the scratch buffer grew after setup.
    pub growths: usize,

    /// Current scratch capacity in cells.
    pub capacity: usize,
}

/// Owner of the scratch buffer for a batch of distance evaluations.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    slot: Slot,
    evaluations: usize,
    early_exits: usize,
}

/// Create a session with the default configuration and set it up.
pub fn setup() -> Result<Session> {
    let mut session = Session::new();
    session.setup()?;
    Ok(session)
}

impl Session {
    /// Create an uninitialized session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create an uninitialized session.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            slot: Slot::Uninitialized,
            evaluations: 0,
            early_exits: 0,
        }
    }

    /// Allocate the scratch buffer and move to [`SessionState::Ready`].
    ///
    /// Fails with [`DistanceError::InvalidState`] unless the session is
    /// uninitialized, and with [`DistanceError::AllocationError`] if the
    /// buffer cannot be allocated (the session then stays uninitialized).
    pub fn setup(&mut self) -> Result<()> {
        if !matches!(self.slot, Slot::Uninitialized) {
            return Err(DistanceError::InvalidState {
                state: self.slot.state(),
            });
        }

        let scratch =
            ScratchBuffer::with_capacity(self.config.initial_capacity, self.config.max_capacity)
                .map_err(|err| {
                    warn!(error = %err, "session setup failed");
                    err
                })?;

        debug!(
            initial_capacity = self.config.initial_capacity,
            max_capacity = ?self.config.max_capacity,
            "session ready"
        );
        self.slot = Slot::Ready(scratch);
        Ok(())
    }

    /// Release the scratch buffer and move to [`SessionState::TornDown`].
    ///
    /// Tearing down twice is harmless.
    pub fn teardown(&mut self) {
        if let Slot::Ready(scratch) = &self.slot {
            debug!(
                evaluations = self.evaluations,
                early_exits = self.early_exits,
                growths = scratch.growths(),
                capacity = scratch.capacity(),
                "session torn down"
            );
        }
        self.slot = Slot::TornDown;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.slot.state()
    }

    /// Configuration this session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snapshot of the session counters.
    pub fn stats(&self) -> SessionStats {
        let (growths, capacity) = match &self.slot {
            Slot::Ready(scratch) => (scratch.growths(), scratch.capacity()),
            _ => (0, 0),
        };
        SessionStats {
            evaluations: self.evaluations,
            early_exits: self.early_exits,
            growths,
            capacity,
        }
    }

    fn scratch(&mut self) -> Result<&mut ScratchBuffer> {
        match &mut self.slot {
            Slot::Ready(scratch) => Ok(scratch),
            other => Err(DistanceError::InvalidState {
                state: other.state(),
            }),
        }
    }

    /// Evaluate `variant` on one string pair.
    ///
    /// `bound` must match what the variant takes (see
    /// [`Variant::bound_kind`]). Bounded variants return
    /// `min(distance, bound + 1)`.
    ///
    /// # Errors
    ///
    /// - [`DistanceError::InvalidState`] if the session is not ready
    /// - [`DistanceError::InvalidArgument`] if `bound` is out of range or of
    ///   the wrong kind
    /// - [`DistanceError::AllocationError`] if the buffer cannot grow to fit
    ///   the pair; the session keeps its previous buffer and stays ready
    pub fn evaluate(
        &mut self,
        variant: Variant,
        subject: &[u8],
        query: &[u8],
        bound: impl Into<Bound>,
    ) -> Result<usize> {
        let scratch = self.scratch()?;
        let bound = variant.resolve_bound(bound.into(), subject.len(), query.len())?;
        let Some(layout) = variant.layout() else {
            self.evaluations += 1;
            return Ok(Variant::NO_OP_RESULT);
        };

        let outcome = match distance::plan(layout, variant.trims_affixes(), subject, query, bound)
        {
            Plan::Resolved(outcome) => outcome,
            Plan::Run(job) => {
                let required = job.required_cells();
                let previous = scratch.capacity();
                let grew = scratch.ensure(required).map_err(|err| {
                    warn!(
                        %variant,
                        requested = required,
                        capacity = previous,
                        error = %err,
                        "scratch buffer growth failed"
                    );
                    err
                })?;
                if grew {
                    debug!(%variant, from = previous, to = required, "scratch buffer grew");
                }
                job.run(scratch)
            }
        };

        self.evaluations += 1;
        if outcome.terminated_early {
            self.early_exits += 1;
        }
        trace!(
            %variant,
            subject_len = subject.len(),
            query_len = query.len(),
            ?bound,
            distance = outcome.distance,
            "evaluated"
        );
        Ok(outcome.distance)
    }

    /// Evaluate `variant` between `query` and every candidate, in order.
    ///
    /// Stops at the first error.
    pub fn evaluate_all<'c, I>(
        &mut self,
        variant: Variant,
        query: &[u8],
        candidates: I,
        bound: impl Into<Bound>,
    ) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'c [u8]>,
    {
        let bound = bound.into();
        candidates
            .into_iter()
            .map(|candidate| self.evaluate(variant, candidate, query, bound))
            .collect()
    }

    /// Find the candidate closest to `query` within `max` edits.
    ///
    /// Runs [`Variant::BoundedMin`] over the candidates, lowering the bound
    /// below the best distance found so far so later candidates can be
    /// abandoned sooner. Returns `(index, distance)` of the first candidate
    /// with the smallest distance, or `None` if nothing is within `max`.
    ///
    /// # Example
    ///
    /// ```rust
    /// let mut session = damlev::session::setup()?;
    /// let words: [&[u8]; 3] = [b"levenstein", b"levenshtein", b"leviathan"];
    /// assert_eq!(session.nearest(b"levenshtien", words, 3)?, Some((1, 1)));
    /// # Ok::<(), damlev::error::DistanceError>(())
    /// ```
    pub fn nearest<'c, I>(
        &mut self,
        query: &[u8],
        candidates: I,
        max: i64,
    ) -> Result<Option<(usize, usize)>>
    where
        I: IntoIterator<Item = &'c [u8]>,
    {
        self.scratch()?;
        let Some(mut bound) = Variant::BoundedMin.resolve_bound(Bound::Distance(max), 0, 0)?
        else {
            return Ok(None);
        };

        let mut best = None;
        for (index, candidate) in candidates.into_iter().enumerate() {
            let distance = self.evaluate(
                Variant::BoundedMin,
                candidate,
                query,
                Bound::Distance(i64::try_from(bound).unwrap_or(i64::MAX)),
            )?;
            if distance > bound {
                continue;
            }

            best = Some((index, distance));
            if distance == 0 {
                break;
            }
            // Only strictly closer candidates can replace this one.
            bound = distance - 1;
        }
        Ok(best)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Session {
        setup().unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Uninitialized);

        session.setup().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.stats().capacity, ScratchBuffer::DEFAULT_CAPACITY);

        session.teardown();
        assert_eq!(session.state(), SessionState::TornDown);
        assert_eq!(session.stats().capacity, 0);

        session.teardown();
        assert_eq!(session.state(), SessionState::TornDown);
    }

    #[test]
    fn test_evaluate_before_setup() {
        let mut session = Session::new();
        assert_eq!(
            session.evaluate(Variant::Classic, b"a", b"b", Bound::None),
            Err(DistanceError::InvalidState {
                state: SessionState::Uninitialized
            })
        );
    }

    #[test]
    fn test_evaluate_after_teardown() {
        let mut session = ready();
        session.teardown();
        for variant in Variant::ALL {
            assert_eq!(
                session.evaluate(variant, b"a", b"b", Bound::None),
                Err(DistanceError::InvalidState {
                    state: SessionState::TornDown
                })
            );
        }
    }

    #[test]
    fn test_setup_twice() {
        let mut session = ready();
        assert_eq!(
            session.setup(),
            Err(DistanceError::InvalidState {
                state: SessionState::Ready
            })
        );
    }

    #[test]
    fn test_setup_over_ceiling() {
        let mut session = Session::with_config(
            SessionConfig::default()
                .with_initial_capacity(128)
                .with_max_capacity(64),
        );
        assert!(matches!(
            session.setup(),
            Err(DistanceError::AllocationError { requested: 128, .. })
        ));
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn test_variants() {
        let mut session = ready();
        for variant in [Variant::Classic, Variant::Reduced1D, Variant::Full2D] {
            assert_eq!(session.evaluate(variant, b"kitten", b"sitting", Bound::None), Ok(3));
            assert_eq!(session.evaluate(variant, b"ab", b"ba", Bound::None), Ok(1));
        }
        assert_eq!(session.evaluate(Variant::Bounded, b"kitten", b"sitting", Bound::Distance(1)), Ok(2));
        assert_eq!(session.evaluate(Variant::BoundedMin, b"kitten", b"sitting", Bound::Distance(5)), Ok(3));
        assert_eq!(
            session.evaluate(Variant::PercentageBounded, b"aaaaaaaaaa", b"bbbbbbbbbb", Bound::Percent(0.5)),
            Ok(6)
        );
        assert_eq!(
            session.evaluate(Variant::NoOp, b"kitten", b"sitting", Bound::None),
            Ok(Variant::NO_OP_RESULT)
        );
    }

    #[test]
    fn test_invalid_bound_is_an_error() {
        let mut session = ready();
        assert!(matches!(
            session.evaluate(Variant::Bounded, b"a", b"b", Bound::Distance(-1)),
            Err(DistanceError::InvalidArgument(_))
        ));
        assert!(matches!(
            session.evaluate(Variant::PercentageBounded, b"a", b"b", Bound::Percent(1.0)),
            Err(DistanceError::InvalidArgument(_))
        ));
        assert_eq!(session.stats().evaluations, 0);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_growth_failure_keeps_session_ready() {
        let mut session =
            Session::with_config(SessionConfig::default().with_initial_capacity(32).with_max_capacity(64));
        session.setup().unwrap();

        // 3 * (20 + 1) = 63 cells fits under the ceiling.
        let short = [b'x'; 20];
        assert_eq!(session.evaluate(Variant::Reduced1D, b"y", &short, Bound::None), Ok(20));
        assert_eq!(session.stats().capacity, 63);

        let long = [b'x'; 40];
        assert!(matches!(
            session.evaluate(Variant::Reduced1D, b"y", &long, Bound::None),
            Err(DistanceError::AllocationError { requested: 123, .. })
        ));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.stats().capacity, 63);

        // Bounded calls need only the band and still fit.
        assert_eq!(session.evaluate(Variant::Bounded, b"y", &long, Bound::Distance(2)), Ok(3));
        assert_eq!(session.evaluate(Variant::Classic, b"kitten", b"sitting", Bound::None), Ok(3));
    }

    #[test]
    fn test_stats() {
        let mut session = Session::with_config(SessionConfig::default().with_initial_capacity(0));
        session.setup().unwrap();

        session.evaluate(Variant::Classic, b"kitten", b"sitting", Bound::None).unwrap();
        session.evaluate(Variant::Bounded, b"aaaaaaaaaa", b"bbbbbbbbbb", Bound::Distance(2)).unwrap();
        session.evaluate(Variant::Bounded, b"a", b"abcdef", Bound::Distance(2)).unwrap();

        let stats = session.stats();
        assert_eq!(stats.evaluations, 3);
        assert_eq!(stats.early_exits, 2);
        assert_eq!(stats.growths, 1);
    }

    #[test]
    fn test_evaluate_all() {
        let mut session = ready();
        let candidates: [&[u8]; 3] = [b"kitten", b"sitting", b"mitten"];
        assert_eq!(
            session.evaluate_all(Variant::Bounded, b"kitten", candidates, Bound::Distance(2)),
            Ok(vec![0, 3, 1])
        );
    }

    #[test]
    fn test_nearest() {
        let mut session = ready();
        let candidates: [&[u8]; 4] = [b"sitting", b"mitten", b"kitchen", b"bitten"];
        assert_eq!(session.nearest(b"kitten", candidates, 3), Ok(Some((1, 1))));
        assert_eq!(session.nearest(b"kitten", candidates, 0), Ok(None));
        assert_eq!(session.nearest(b"kitten", Vec::<&[u8]>::new(), 3), Ok(None));
        assert!(matches!(
            session.nearest(b"kitten", candidates, -1),
            Err(DistanceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_nearest_stops_on_exact_match() {
        let mut session = ready();
        let candidates: [&[u8]; 3] = [b"kitchen", b"kitten", b"mitten"];
        assert_eq!(session.nearest(b"kitten", candidates, 3), Ok(Some((1, 0))));
        assert_eq!(session.stats().evaluations, 2);
    }
}
