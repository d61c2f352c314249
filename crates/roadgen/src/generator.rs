//! Tick-driven road generator.
//!
//! Purpose
//! - Owns the chain of placed pieces (oldest first), a prototype catalog, and a
//!   `ChoiceEngine` over the catalog's prototypes.
//! - Each tick advances the search a few steps, then asks a `PlacementPolicy`
//!   whether to place the next piece and whether to drop the oldest one.
//!
//! Conventions
//! - A new piece starts at the end frame of the newest piece (identity for an
//!   empty chain) and gets sequence number `newest.seq + 1` (0 for an empty chain).
//! - Every change to the chain restarts the search with a fresh preference order.
//! - This is the only layer that logs (`tracing`); the search core stays silent.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::frame::AffineFrame;
use crate::piece::{Catalog, CatalogError, PieceId, PlacedPiece, Prototype};
use crate::search::{ChoiceEngine, SearchCfg, SearchError, SearchStatus};
use crate::shape::PieceShape;

/// Generator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorCfg {
    pub search: SearchCfg,
    /// Engine steps taken at the start of every tick.
    pub steps_per_tick: usize,
}

impl Default for GeneratorCfg {
    fn default() -> Self {
        Self {
            search: SearchCfg::default(),
            steps_per_tick: 1,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Decisions and notifications that shape a generated road.
pub trait PlacementPolicy {
    /// Asked once per tick with the current chain.
    fn should_place(&mut self, pieces: &VecDeque<PlacedPiece>) -> bool;
    /// Asked once per tick, after any placement.
    fn should_remove(&mut self, pieces: &VecDeque<PlacedPiece>) -> bool;
    /// Candidate order for the next search; earlier entries are preferred.
    fn preference_order(&mut self, available: Vec<Arc<Prototype>>) -> Vec<Arc<Prototype>>;

    fn on_placed(&mut self, _piece: &PlacedPiece) {}
    fn on_removed(&mut self, _piece: &PlacedPiece) {}
    fn on_no_choice(&mut self) {}
    fn on_catalog_empty(&mut self) {}
}

/// What happened during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of the piece placed this tick.
    pub placed: Option<u64>,
    /// Sequence number of the piece removed this tick.
    pub removed: Option<u64>,
    /// A placement was requested but the search had nothing to offer.
    pub no_choice: bool,
    pub status: SearchStatus,
}

/// Totals over a `run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub placed: u64,
    pub removed: u64,
    pub no_choice: u64,
}

#[derive(Debug)]
pub struct RoadGenerator<P> {
    cfg: GeneratorCfg,
    catalog: Catalog,
    policy: P,
    engine: ChoiceEngine<Arc<Prototype>>,
    pieces: VecDeque<PlacedPiece>,
    /// False while the catalog offers no candidates (no live search session).
    ready: bool,
}

impl<P: PlacementPolicy> RoadGenerator<P> {
    /// Starts with an empty chain and an initial search session.
    pub fn new(cfg: GeneratorCfg, catalog: Catalog, policy: P) -> Result<Self, GeneratorError> {
        let mut generator = Self {
            cfg,
            catalog,
            policy,
            engine: ChoiceEngine::new(cfg.search),
            pieces: VecDeque::new(),
            ready: false,
        };
        generator.reset_engine()?;
        Ok(generator)
    }

    /// Append a piece as-is (already in world space) and restart the search.
    pub fn push_preset(&mut self, id: PieceId, shape: PieceShape) -> Result<u64, GeneratorError> {
        let seq = self.next_seq();
        self.pieces.push_back(PlacedPiece { id, seq, shape });
        self.reset_engine()?;
        Ok(seq)
    }

    pub fn tick(&mut self) -> Result<TickReport, GeneratorError> {
        if self.ready {
            for _ in 0..self.cfg.steps_per_tick {
                if self.engine.step()?.is_terminal() {
                    break;
                }
            }
        }

        let mut placed = None;
        let mut no_choice = false;
        if self.policy.should_place(&self.pieces) {
            placed = self.try_place()?;
            no_choice = placed.is_none();
        }

        let mut removed = None;
        if self.policy.should_remove(&self.pieces) {
            removed = self.remove_oldest()?;
        }

        Ok(TickReport {
            placed,
            removed,
            no_choice,
            status: self.engine.status(),
        })
    }

    /// Tick `ticks` times and tally the outcomes.
    pub fn run(&mut self, ticks: u64) -> Result<RunSummary, GeneratorError> {
        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            let report = self.tick()?;
            summary.ticks += 1;
            summary.placed += u64::from(report.placed.is_some());
            summary.removed += u64::from(report.removed.is_some());
            summary.no_choice += u64::from(report.no_choice);
        }
        Ok(summary)
    }

    /// Drop the oldest piece, if any, and restart the search.
    pub fn remove_oldest(&mut self) -> Result<Option<u64>, GeneratorError> {
        let Some(oldest) = self.pieces.pop_front() else {
            return Ok(None);
        };
        debug!(seq = oldest.seq, id = %oldest.id, "removed piece");
        self.policy.on_removed(&oldest);
        self.reset_engine()?;
        Ok(Some(oldest.seq))
    }

    /// Place the engine's choice; `None` when there is nothing to place.
    fn try_place(&mut self) -> Result<Option<u64>, GeneratorError> {
        if !self.ready {
            warn!("catalog is empty; nothing to place");
            self.policy.on_catalog_empty();
            return Ok(None);
        }
        if self.engine.step_until_choice_found()? != SearchStatus::Found {
            info!(pieces = self.pieces.len(), "no choice found");
            self.policy.on_no_choice();
            return Ok(None);
        }
        let full_id = self.engine.choice_prototype()?.full_id();
        let piece = self
            .catalog
            .claim(&full_id, self.next_seq(), &self.chain_end())?;
        let seq = piece.seq;
        debug!(seq, id = %piece.id, "placed piece");
        self.policy.on_placed(&piece);
        self.pieces.push_back(piece);
        self.reset_engine()?;
        Ok(Some(seq))
    }

    fn reset_engine(&mut self) -> Result<(), GeneratorError> {
        let order = self.policy.preference_order(self.catalog.available());
        if order.is_empty() {
            warn!("catalog is empty; search not started");
            self.policy.on_catalog_empty();
            self.ready = false;
            return Ok(());
        }
        let world = self.pieces.iter().map(|p| p.shape.clone()).collect();
        self.engine.reset(world, order, self.cfg.search.depth)?;
        self.ready = true;
        Ok(())
    }
}

impl<P> RoadGenerator<P> {
    #[inline]
    pub fn cfg(&self) -> &GeneratorCfg {
        &self.cfg
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Current chain, oldest first.
    #[inline]
    pub fn pieces(&self) -> &VecDeque<PlacedPiece> {
        &self.pieces
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.engine.status()
    }

    /// Where the next piece would start.
    pub fn chain_end(&self) -> AffineFrame {
        self.pieces
            .back()
            .map_or_else(AffineFrame::identity, |p| *p.shape.end())
    }

    fn next_seq(&self) -> u64 {
        self.pieces.back().map_or(0, |p| p.seq + 1)
    }
}

/// Keeps the road at `target_length` pieces, placing one every `place_every`
/// ticks and trying candidates in a seeded random order.
#[derive(Clone, Debug)]
pub struct TargetLengthPolicy {
    target_length: usize,
    place_every: u32,
    countdown: u32,
    rng: StdRng,
    no_choice: u64,
    catalog_empty: u64,
}

impl TargetLengthPolicy {
    pub fn new(target_length: usize, place_every: u32, seed: u64) -> Self {
        Self {
            target_length,
            place_every: place_every.max(1),
            countdown: 0,
            rng: StdRng::seed_from_u64(seed),
            no_choice: 0,
            catalog_empty: 0,
        }
    }

    #[inline]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Number of placement attempts that found no choice.
    #[inline]
    pub fn no_choice_count(&self) -> u64 {
        self.no_choice
    }

    #[inline]
    pub fn catalog_empty_count(&self) -> u64 {
        self.catalog_empty
    }
}

impl PlacementPolicy for TargetLengthPolicy {
    fn should_place(&mut self, _pieces: &VecDeque<PlacedPiece>) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        self.countdown == 0
    }

    fn should_remove(&mut self, pieces: &VecDeque<PlacedPiece>) -> bool {
        pieces.len() > self.target_length
    }

    fn preference_order(&mut self, mut available: Vec<Arc<Prototype>>) -> Vec<Arc<Prototype>> {
        available.shuffle(&mut self.rng);
        available
    }

    fn on_placed(&mut self, _piece: &PlacedPiece) {
        self.countdown = self.place_every;
    }

    fn on_no_choice(&mut self) {
        self.no_choice += 1;
    }

    fn on_catalog_empty(&mut self) {
        self.catalog_empty += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::presets::{standard_catalog, straight, stub};

    /// Places every tick, never removes, keeps catalog order.
    #[derive(Default)]
    struct Greedy {
        placed: Vec<u64>,
        no_choice: u32,
        catalog_empty: u32,
    }

    impl PlacementPolicy for Greedy {
        fn should_place(&mut self, _: &VecDeque<PlacedPiece>) -> bool {
            true
        }
        fn should_remove(&mut self, _: &VecDeque<PlacedPiece>) -> bool {
            false
        }
        fn preference_order(&mut self, available: Vec<Arc<Prototype>>) -> Vec<Arc<Prototype>> {
            available
        }
        fn on_placed(&mut self, piece: &PlacedPiece) {
            self.placed.push(piece.seq);
        }
        fn on_no_choice(&mut self) {
            self.no_choice += 1;
        }
        fn on_catalog_empty(&mut self) {
            self.catalog_empty += 1;
        }
    }

    fn close(a: &AffineFrame, b: &AffineFrame) -> bool {
        (a.position - b.position).norm() < 1e-6 && a.rotation.angle_to(&b.rotation) < 1e-6
    }

    fn generator(target: usize, seed: u64) -> RoadGenerator<TargetLengthPolicy> {
        RoadGenerator::new(
            GeneratorCfg::default(),
            standard_catalog(),
            TargetLengthPolicy::new(target, 1, seed),
        )
        .unwrap()
    }

    #[test]
    fn chain_stays_connected_and_disjoint() {
        let target = 8;
        let mut g = generator(target, 7);
        let summary = g.run(200).unwrap();
        assert!(summary.placed as usize >= target);
        assert!(g.pieces().len() <= target);
        assert_eq!(summary.placed - summary.removed, g.pieces().len() as u64);

        let pieces: Vec<_> = g.pieces().iter().collect();
        for pair in pieces.windows(2) {
            assert_eq!(pair[1].seq, pair[0].seq + 1);
            assert!(close(pair[1].shape.start(), pair[0].shape.end()));
        }
        for (i, a) in pieces.iter().enumerate() {
            for b in &pieces[i + 1..] {
                assert!(!a.shape.overlaps(&b.shape), "{} overlaps {}", a.seq, b.seq);
            }
        }
    }

    #[test]
    fn same_seed_same_road() {
        let ids = |seed| {
            let mut g = generator(6, seed);
            g.run(60).unwrap();
            g.pieces()
                .iter()
                .map(|p| (p.seq, p.id.to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(42), ids(42));
    }

    #[test]
    fn place_every_spaces_out_placements() {
        let mut g = RoadGenerator::new(
            GeneratorCfg::default(),
            standard_catalog(),
            TargetLengthPolicy::new(100, 3, 1),
        )
        .unwrap();
        let placed: Vec<bool> = (0..9)
            .map(|_| g.tick().unwrap().placed.is_some())
            .collect();
        assert_eq!(
            placed,
            vec![true, false, false, true, false, false, true, false, false]
        );
    }

    #[test]
    fn first_piece_starts_at_origin_then_follows_presets() {
        let mut g = RoadGenerator::new(GeneratorCfg::default(), standard_catalog(), Greedy::default())
            .unwrap();
        g.tick().unwrap();
        assert_eq!(g.pieces()[0].seq, 0);
        assert!(close(g.pieces()[0].shape.start(), &AffineFrame::identity()));

        let mut g = RoadGenerator::new(GeneratorCfg::default(), standard_catalog(), Greedy::default())
            .unwrap();
        let lead = straight(10.0, 2.0);
        assert_eq!(g.push_preset(PieceId::new("straight"), lead.clone()).unwrap(), 0);
        let report = g.tick().unwrap();
        assert_eq!(report.placed, Some(1));
        assert!(close(g.pieces()[1].shape.start(), lead.end()));
        assert_eq!(g.policy().placed, vec![1]);
    }

    #[test]
    fn dead_end_catalog_reports_no_choice() {
        let mut catalog = Catalog::new();
        catalog.insert(Prototype::new("stub", &stub(2.0)), false);
        let cfg = GeneratorCfg {
            search: SearchCfg {
                depth: 1,
                ..SearchCfg::default()
            },
            ..GeneratorCfg::default()
        };
        let mut g = RoadGenerator::new(cfg, catalog, Greedy::default()).unwrap();

        let first = g.tick().unwrap();
        assert_eq!(first.placed, Some(0));
        let second = g.tick().unwrap();
        assert_eq!(second.placed, None);
        assert!(second.no_choice);
        assert_eq!(second.status, SearchStatus::Exhausted);
        assert_eq!(g.policy().no_choice, 1);
        assert_eq!(g.pieces().len(), 1);
    }

    #[test]
    fn removal_restarts_search() {
        let mut catalog = Catalog::new();
        catalog.insert(Prototype::new("stub", &stub(2.0)), false);
        let cfg = GeneratorCfg {
            search: SearchCfg {
                depth: 1,
                ..SearchCfg::default()
            },
            ..GeneratorCfg::default()
        };
        let mut g = RoadGenerator::new(cfg, catalog, Greedy::default()).unwrap();
        g.tick().unwrap();
        g.tick().unwrap();
        assert_eq!(g.status(), SearchStatus::Exhausted);

        assert_eq!(g.remove_oldest().unwrap(), Some(0));
        assert_eq!(g.status(), SearchStatus::NotYetFound);
        assert!(g.pieces().is_empty());
        assert_eq!(g.remove_oldest().unwrap(), None);
        // numbering restarts with an empty chain
        assert_eq!(g.tick().unwrap().placed, Some(0));
    }

    #[test]
    fn empty_catalog_is_reported_not_fatal() {
        let mut g = RoadGenerator::new(GeneratorCfg::default(), Catalog::new(), Greedy::default())
            .unwrap();
        assert_eq!(g.policy().catalog_empty, 1);
        let report = g.tick().unwrap();
        assert_eq!(report.placed, None);
        assert_eq!(g.policy().catalog_empty, 2);
        assert!(g.pieces().is_empty());
    }
}
