use anyhow::Result;
use clap::{Parser, Subcommand};
use roadgen::generator::{GeneratorCfg, RoadGenerator, TargetLengthPolicy};
use roadgen::piece::presets::standard_catalog;
use roadgen::piece::Catalog;
use roadgen::search::SearchCfg;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod pieces;
mod provenance;

use pieces::PlacedRecord;
use provenance::{RunOutcome, RunParams, RunRecord};

#[derive(Parser)]
#[command(name = "roadgen-cli")]
#[command(about = "Generate non-overlapping road-piece chains")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run the generator and write the final chain as JSON
    Generate(GenerateArgs),
    /// List the prototype ids a piece file (or the built-in set) provides
    Catalog {
        /// Piece definitions (JSON); built-in presets when omitted
        #[arg(long)]
        pieces: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(clap::Args, Clone, Debug)]
struct GenerateArgs {
    /// Piece definitions (JSON); built-in presets when omitted
    #[arg(long)]
    pieces: Option<PathBuf>,
    #[arg(long, default_value_t = 200)]
    ticks: u64,
    /// Lookahead depth of the choice search
    #[arg(long, default_value_t = 5)]
    depth: usize,
    /// Engine steps per tick before placement decisions
    #[arg(long, default_value_t = 1)]
    steps_per_tick: usize,
    /// Oldest pieces are dropped beyond this many
    #[arg(long, default_value_t = 10)]
    target_length: usize,
    /// Place a piece every N ticks
    #[arg(long, default_value_t = 1)]
    place_every: u32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate(args) => generate(&args).map(|_| ()),
        Action::Catalog { pieces } => catalog(pieces.as_deref()),
        Action::Report => report(),
    }
}

fn load(file: Option<&Path>) -> Result<Catalog> {
    match file {
        Some(path) => pieces::load_catalog(path),
        None => Ok(standard_catalog()),
    }
}

/// Returns the provenance sidecar path.
fn generate(args: &GenerateArgs) -> Result<PathBuf> {
    tracing::info!(
        ticks = args.ticks,
        depth = args.depth,
        target_length = args.target_length,
        place_every = args.place_every,
        seed = args.seed,
        out = %args.out.display(),
        "generate"
    );
    let catalog = load(args.pieces.as_deref())?;
    let cfg = GeneratorCfg {
        search: SearchCfg {
            depth: args.depth,
            ..SearchCfg::default()
        },
        steps_per_tick: args.steps_per_tick,
    };
    let policy = TargetLengthPolicy::new(args.target_length, args.place_every, args.seed);
    let mut road = RoadGenerator::new(cfg, catalog, policy)?;
    let summary = road.run(args.ticks)?;
    let outcome = RunOutcome::new(&summary, &road);
    tracing::info!(
        placed = outcome.placed,
        removed = outcome.removed,
        no_choice = outcome.no_choice,
        length = outcome.length,
        status = %outcome.status,
        "done"
    );

    let records: Vec<PlacedRecord> = road.pieces().iter().map(PlacedRecord::from).collect();
    let doc = json!({
        "summary": outcome,
        "pieces": records,
    });
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.out, serde_json::to_vec_pretty(&doc)?)?;

    let params = RunParams {
        pieces: args.pieces.clone(),
        ticks: args.ticks,
        depth: args.depth,
        steps_per_tick: args.steps_per_tick,
        target_length: args.target_length,
        place_every: args.place_every,
        seed: args.seed,
    };
    RunRecord::new(params, &road, outcome, &args.out).write()
}

fn catalog(file: Option<&Path>) -> Result<()> {
    let catalog = load(file)?;
    let ids: Vec<&str> = catalog.ids().collect();
    println!("{}", serde_json::to_string_pretty(&ids)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": roadgen::VERSION,
        "presets": standard_catalog().ids().collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
