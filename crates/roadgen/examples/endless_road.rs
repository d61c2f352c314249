//! Grow a road with the built-in pieces and print the chain after each placement.
//!
//! Usage:
//!   cargo run -p roadgen --example endless_road -- [seed]

use roadgen::generator::{GeneratorCfg, RoadGenerator, TargetLengthPolicy};
use roadgen::piece::presets::standard_catalog;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025u64);
    let policy = TargetLengthPolicy::new(12, 2, seed);
    let mut road = match RoadGenerator::new(GeneratorCfg::default(), standard_catalog(), policy) {
        Ok(road) => road,
        Err(err) => {
            eprintln!("cannot start generator: {err}");
            return;
        }
    };
    for tick in 0..80 {
        let report = match road.tick() {
            Ok(report) => report,
            Err(err) => {
                eprintln!("tick {tick}: {err}");
                return;
            }
        };
        if let Some(seq) = report.placed {
            let end = road.chain_end().position;
            let ids: Vec<String> = road.pieces().iter().map(|p| p.id.to_string()).collect();
            println!(
                "tick {tick:>3}: placed #{seq:<3} end=({:7.2}, {:5.2}, {:7.2})  [{}]",
                end.x,
                end.y,
                end.z,
                ids.join(" ")
            );
        } else if report.no_choice {
            println!("tick {tick:>3}: no choice");
        }
    }
}
