//! Run record written next to each generated road.
//!
//! `road.json` gets a sibling `road.provenance.json` holding the parameters the
//! run was started with, the prototype ids it could choose from and how the
//! run went, so a road file can be traced back to the command that made it.

use anyhow::{Context, Result};
use roadgen::generator::{RoadGenerator, RunSummary};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::pieces::FrameDef;

/// Generator inputs as given on the command line.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RunParams {
    /// Piece file; `None` means the built-in presets.
    pub pieces: Option<PathBuf>,
    pub ticks: u64,
    pub depth: usize,
    pub steps_per_tick: usize,
    pub target_length: usize,
    pub place_every: u32,
    pub seed: u64,
}

/// What a finished run produced.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunOutcome {
    pub ticks: u64,
    pub placed: u64,
    pub removed: u64,
    pub no_choice: u64,
    /// Pieces left in the chain.
    pub length: usize,
    /// Search status after the last tick.
    pub status: String,
    pub chain_end: FrameDef,
}

impl RunOutcome {
    pub fn new<P>(summary: &RunSummary, road: &RoadGenerator<P>) -> Self {
        Self {
            ticks: summary.ticks,
            placed: summary.placed,
            removed: summary.removed,
            no_choice: summary.no_choice,
            length: road.pieces().len(),
            status: format!("{:?}", road.status()),
            chain_end: FrameDef::from_frame(&road.chain_end()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunRecord {
    pub code_rev: String,
    pub version: String,
    pub params: RunParams,
    /// Full ids of every prototype the search could pick.
    pub catalog: Vec<String>,
    pub outcome: RunOutcome,
    pub road: PathBuf,
}

impl RunRecord {
    pub fn new<P>(params: RunParams, road: &RoadGenerator<P>, outcome: RunOutcome, road_path: &Path) -> Self {
        Self {
            code_rev: current_git_rev(),
            version: roadgen::VERSION.to_string(),
            params,
            catalog: road.catalog().ids().map(str::to_string).collect(),
            outcome,
            road: road_path.to_path_buf(),
        }
    }

    /// Write next to the road file; returns the sidecar path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = sidecar_path(&self.road);
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing run record {}", path.display()))
    }
}

/// `dir/road.json` → `dir/road.provenance.json`.
pub fn sidecar_path(road: &Path) -> PathBuf {
    let stem = road.file_stem().map_or_else(|| "road".into(), |s| s.to_string_lossy());
    road.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|rev| rev.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadgen::generator::{GeneratorCfg, TargetLengthPolicy};
    use roadgen::piece::presets::standard_catalog;
    use tempfile::tempdir;

    fn params() -> RunParams {
        RunParams {
            pieces: None,
            ticks: 12,
            depth: 3,
            steps_per_tick: 1,
            target_length: 4,
            place_every: 1,
            seed: 9,
        }
    }

    #[test]
    fn sidecar_sits_next_to_the_road() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/roads/loop.json")),
            Path::new("/tmp/roads/loop.provenance.json")
        );
        assert_eq!(sidecar_path(Path::new("loop")), Path::new("loop.provenance.json"));
    }

    #[test]
    fn record_captures_catalog_and_outcome() {
        let dir = tempdir().unwrap();
        let road_path = dir.path().join("road.json");
        let p = params();
        let mut road = RoadGenerator::new(
            GeneratorCfg::default(),
            standard_catalog(),
            TargetLengthPolicy::new(p.target_length, p.place_every, p.seed),
        )
        .unwrap();
        let summary = road.run(p.ticks).unwrap();
        let outcome = RunOutcome::new(&summary, &road);
        assert_eq!(outcome.length, road.pieces().len());
        assert!(outcome.length <= p.target_length);
        assert_eq!(outcome.placed - outcome.removed, outcome.length as u64);

        let record = RunRecord::new(p.clone(), &road, outcome, &road_path);
        let written = record.write().unwrap();
        assert_eq!(written, dir.path().join("road.provenance.json"));

        let back = RunRecord::read(&written).unwrap();
        assert_eq!(back.params, p);
        assert_eq!(back.version, roadgen::VERSION);
        assert_eq!(back.road, road_path);
        let catalog = standard_catalog();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(back.catalog, ids);
        assert_eq!(back.outcome.ticks, 12);
    }

    #[test]
    fn reading_garbage_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("road.provenance.json");
        fs::write(&path, "{\"code_rev\": 1}").unwrap();
        let err = RunRecord::read(&path).unwrap_err();
        assert!(format!("{err:#}").contains("road.provenance.json"));
    }
}
