//! Status, configuration, and error types shared by the combination search and
//! the choice engine.

use thiserror::Error;

/// Slot value for a depth level that has no branch assigned yet.
pub const UNASSIGNED: isize = -1;

/// Where a search session stands. Routine outcomes, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Still exploring; keep stepping.
    NotYetFound,
    /// Every depth level holds a validated choice.
    Found,
    /// Every combination was tried and rejected.
    Exhausted,
}

impl SearchStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::NotYetFound)
    }
}

/// Search configuration.
///
/// The caps are safety valves against logic errors, not tuning knobs: hitting
/// either one is reported as `SearchError::IterationCap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchCfg {
    /// Lookahead depth (number of future pieces validated before committing).
    pub depth: usize,
    /// Bound on the upward walk of a single backtrack.
    pub backtrack_cap: usize,
    /// Bound on `step` calls inside `step_until_choice_found`.
    pub step_cap: usize,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            depth: 5,
            backtrack_cap: 10_000,
            step_cap: 10_000_000,
        }
    }
}

/// Contract violations and internal invariant failures of the search.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid search params: {reason}")]
    InvalidParams { reason: String },
    #[error("invalid choice state {state:?}: {reason}")]
    InvalidState { state: Vec<isize>, reason: String },
    #[error("search already finished ({0:?}); reset before stepping again")]
    AlreadyTerminal(SearchStatus),
    #[error("iteration cap {cap} exceeded while {during}")]
    IterationCap { cap: usize, during: &'static str },
    #[error("no choice available (status {0:?})")]
    NoChoice(SearchStatus),
    #[error("choice engine used before reset")]
    NotReset,
}

impl SearchError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_state(state: &[isize], reason: impl Into<String>) -> Self {
        Self::InvalidState {
            state: state.to_vec(),
            reason: reason.into(),
        }
    }
}
