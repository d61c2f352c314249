//! Resumable depth-first traversal of a complete tree with fixed branching.

use super::types::{SearchError, SearchStatus, UNASSIGNED};

/// DFS over `branches^depth` combinations, one verdict at a time.
///
/// Invariants:
/// - `choices.len() == depth`; each slot is `UNASSIGNED` or in `0..branches`.
/// - Assigned slots form a contiguous prefix starting at index 0.
///
/// The caller judges the deepest assigned choice and reports back with
/// `step_valid` (descend) or `step_invalid` (next sibling, backtracking as
/// needed). Nothing is evaluated here; the state is the whole search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinationSearch {
    choices: Vec<isize>,
    branches: usize,
    status: SearchStatus,
    backtrack_cap: usize,
}

impl CombinationSearch {
    /// Fresh search at `[0, -1, ..., -1]` with the default backtrack cap.
    pub fn new(branches: usize, depth: usize) -> Result<Self, SearchError> {
        Self::with_cap(branches, depth, super::SearchCfg::default().backtrack_cap)
    }

    /// `backtrack_cap` must cover a walk from the deepest slot up to the root.
    pub fn with_cap(branches: usize, depth: usize, backtrack_cap: usize) -> Result<Self, SearchError> {
        check_params(branches, depth)?;
        check_cap(backtrack_cap, depth)?;
        let mut choices = vec![UNASSIGNED; depth];
        choices[0] = 0;
        Ok(Self {
            choices,
            branches,
            status: SearchStatus::NotYetFound,
            backtrack_cap,
        })
    }

    /// Resume from a saved choice vector (status restarts as `NotYetFound`).
    pub fn from_state(branches: usize, state: Vec<isize>) -> Result<Self, SearchError> {
        check_params(branches, state.len())?;
        let backtrack_cap = super::SearchCfg::default().backtrack_cap;
        check_cap(backtrack_cap, state.len())?;
        let assigned = state.iter().take_while(|&&c| c != UNASSIGNED).count();
        if state[assigned..].iter().any(|&c| c != UNASSIGNED) {
            return Err(SearchError::bad_state(&state, "assigned slots must be a prefix"));
        }
        if state[..assigned].iter().any(|&c| c < 0 || c as usize >= branches) {
            return Err(SearchError::bad_state(&state, "choice out of branch range"));
        }
        Ok(Self {
            choices: state,
            branches,
            status: SearchStatus::NotYetFound,
            backtrack_cap,
        })
    }

    #[inline]
    pub fn state(&self) -> &[isize] {
        &self.choices
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    #[inline]
    pub fn branches(&self) -> usize {
        self.branches
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.choices.len()
    }

    /// Index of the deepest assigned slot; `None` when nothing is assigned.
    pub fn current_depth(&self) -> Option<usize> {
        match self.choices.iter().position(|&c| c == UNASSIGNED) {
            Some(first_free) => first_free.checked_sub(1),
            None => Some(self.choices.len() - 1),
        }
    }

    /// Value at the deepest assigned slot (slot 0 when nothing is assigned).
    pub fn current_choice(&self) -> isize {
        self.choices[self.current_depth().unwrap_or(0)]
    }

    /// Assigned branch indices, shallowest first.
    pub fn assigned(&self) -> impl Iterator<Item = usize> + '_ {
        self.choices
            .iter()
            .take_while(|&&c| c != UNASSIGNED)
            .map(|&c| c as usize)
    }

    /// The deepest choice is acceptable: descend, or finish if the path is full.
    ///
    /// A full path is left as-is and the status becomes `Found`.
    pub fn step_valid(&mut self) -> Result<SearchStatus, SearchError> {
        self.ensure_exploring()?;
        match self.current_depth() {
            Some(d) if d + 1 == self.choices.len() => self.status = SearchStatus::Found,
            Some(d) => self.choices[d + 1] = 0,
            None => self.choices[0] = 0,
        }
        Ok(self.status)
    }

    /// The deepest choice is rejected: try its next sibling, or backtrack.
    ///
    /// Returns `Exhausted` (and stays there) once no untried branch remains at
    /// any level.
    pub fn step_invalid(&mut self) -> Result<SearchStatus, SearchError> {
        self.ensure_exploring()?;
        let depth = self
            .current_depth()
            .ok_or_else(|| SearchError::bad_state(&self.choices, "no choice to reject"))?;
        if self.choices[depth] < self.branches as isize - 1 {
            self.choices[depth] += 1;
            return Ok(self.status);
        }
        self.backtrack(depth)
    }

    /// On a cap breach the choices are restored, so the state stays valid and
    /// the next step reports the same error again.
    fn backtrack(&mut self, depth: usize) -> Result<SearchStatus, SearchError> {
        let saved = self.choices.clone();
        let limit = self.branches as isize;
        let mut level = depth;
        self.choices[level] += 1;
        for _ in 0..self.backtrack_cap {
            if self.choices[level] < limit {
                return Ok(self.status);
            }
            if level == 0 {
                // keep the last tried combination visible
                self.choices[0] = limit - 1;
                self.status = SearchStatus::Exhausted;
                return Ok(self.status);
            }
            self.choices[level] = UNASSIGNED;
            level -= 1;
            self.choices[level] += 1;
        }
        self.choices = saved;
        Err(SearchError::IterationCap {
            cap: self.backtrack_cap,
            during: "backtracking",
        })
    }

    fn ensure_exploring(&self) -> Result<(), SearchError> {
        if self.status.is_terminal() {
            return Err(SearchError::AlreadyTerminal(self.status));
        }
        Ok(())
    }
}

fn check_params(branches: usize, depth: usize) -> Result<(), SearchError> {
    if branches < 1 {
        return Err(SearchError::invalid("need at least one branch"));
    }
    if depth < 1 {
        return Err(SearchError::invalid("need a depth of at least one"));
    }
    if branches > isize::MAX as usize {
        return Err(SearchError::invalid("branch count does not fit a choice slot"));
    }
    Ok(())
}

fn check_cap(backtrack_cap: usize, depth: usize) -> Result<(), SearchError> {
    if backtrack_cap < depth {
        return Err(SearchError::invalid(format!(
            "backtrack cap {backtrack_cap} is below the depth {depth}"
        )));
    }
    Ok(())
}
