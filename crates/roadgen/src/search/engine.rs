//! Incremental piece-choice search over a combination tree.

use crate::frame::AffineFrame;
use crate::piece::Piece;
use crate::shape::PieceShape;

use super::combination::CombinationSearch;
use super::types::{SearchCfg, SearchError, SearchStatus};

/// Finds a depth-limited sequence of candidates whose shapes, chained
/// end-to-start after the world pieces, never overlap anything earlier.
///
/// Each `step` validates only the newest chain element; earlier elements were
/// validated by earlier steps. Callers may step once per tick or block with
/// `step_until_choice_found`.
#[derive(Debug)]
pub struct ChoiceEngine<P> {
    cfg: SearchCfg,
    session: Option<Session<P>>,
}

/// One search over a fixed world snapshot and candidate list.
#[derive(Debug)]
struct Session<P> {
    world: Vec<PieceShape>,
    candidates: Vec<P>,
    search: CombinationSearch,
    impossible: bool,
}

impl<P> Default for ChoiceEngine<P> {
    fn default() -> Self {
        Self::new(SearchCfg::default())
    }
}

impl<P> ChoiceEngine<P> {
    pub fn new(cfg: SearchCfg) -> Self {
        Self { cfg, session: None }
    }

    #[inline]
    pub fn cfg(&self) -> &SearchCfg {
        &self.cfg
    }

    /// Start a new session, discarding any in-progress one.
    ///
    /// `world` is oldest-first; `candidates` is in preference order. Fails when
    /// there are no candidates or `depth == 0`.
    pub fn reset(
        &mut self,
        world: Vec<PieceShape>,
        candidates: Vec<P>,
        depth: usize,
    ) -> Result<(), SearchError> {
        let search = CombinationSearch::with_cap(candidates.len(), depth, self.cfg.backtrack_cap)?;
        self.session = Some(Session {
            world,
            candidates,
            search,
            impossible: false,
        });
        Ok(())
    }

    /// `NotYetFound` before the first reset.
    pub fn status(&self) -> SearchStatus {
        self.session
            .as_ref()
            .map_or(SearchStatus::NotYetFound, Session::status)
    }

    #[inline]
    pub fn has_found_choice(&self) -> bool {
        self.status() == SearchStatus::Found
    }

    #[inline]
    pub fn is_impossible(&self) -> bool {
        self.status() == SearchStatus::Exhausted
    }

    /// Current choice vector of the session, if any.
    pub fn state(&self) -> Option<&[isize]> {
        self.session.as_ref().map(|s| s.search.state())
    }

    /// First piece of the solved chain: the next piece to place.
    pub fn choice_prototype(&self) -> Result<&P, SearchError> {
        let session = self.session.as_ref().ok_or(SearchError::NotReset)?;
        match session.status() {
            SearchStatus::Found => {
                let first = session.search.state()[0] as usize;
                Ok(&session.candidates[first])
            }
            other => Err(SearchError::NoChoice(other)),
        }
    }
}

impl<P: Piece> ChoiceEngine<P> {
    /// Evaluate the deepest assigned candidate once.
    ///
    /// A no-op returning the terminal status once the session is finished.
    pub fn step(&mut self) -> Result<SearchStatus, SearchError> {
        self.session.as_mut().ok_or(SearchError::NotReset)?.step()
    }

    /// Step until `Found` or `Exhausted`, bounded by `cfg.step_cap`.
    pub fn step_until_choice_found(&mut self) -> Result<SearchStatus, SearchError> {
        let cap = self.cfg.step_cap;
        let session = self.session.as_mut().ok_or(SearchError::NotReset)?;
        for _ in 0..cap {
            let status = session.step()?;
            if status.is_terminal() {
                return Ok(status);
            }
        }
        Err(SearchError::IterationCap {
            cap,
            during: "searching for a choice",
        })
    }

    /// Candidate shapes of the current assignment, aligned after the world pieces.
    pub fn candidate_chain(&self) -> Result<Vec<PieceShape>, SearchError> {
        let session = self.session.as_ref().ok_or(SearchError::NotReset)?;
        Ok(session.aligned_candidates())
    }
}

impl<P> Session<P> {
    fn status(&self) -> SearchStatus {
        if self.impossible {
            SearchStatus::Exhausted
        } else {
            self.search.status()
        }
    }

    /// End of the newest world piece, or the origin for an empty world.
    fn chain_start(&self) -> AffineFrame {
        self.world
            .last()
            .map_or_else(AffineFrame::identity, |s| *s.end())
    }
}

impl<P: Piece> Session<P> {
    fn step(&mut self) -> Result<SearchStatus, SearchError> {
        let status = self.status();
        if status.is_terminal() {
            return Ok(status);
        }
        let next = if self.newest_overlaps() {
            self.search.step_invalid()?
        } else {
            self.search.step_valid()?
        };
        if next == SearchStatus::Exhausted {
            self.impossible = true;
        }
        Ok(next)
    }

    fn aligned_candidates(&self) -> Vec<PieceShape> {
        let mut at = self.chain_start();
        let mut out = Vec::with_capacity(self.search.depth());
        for idx in self.search.assigned() {
            let shape = self.candidates[idx].shape().translated_copy(&at);
            at = *shape.end();
            out.push(shape);
        }
        out
    }

    fn newest_overlaps(&self) -> bool {
        let aligned = self.aligned_candidates();
        match aligned.split_last() {
            Some((newest, earlier)) => self
                .world
                .iter()
                .chain(earlier)
                .any(|other| newest.overlaps(other)),
            None => false,
        }
    }
}
