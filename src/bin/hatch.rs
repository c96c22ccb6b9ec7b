//! Hatching binary: turns a rendered sample file into world-space strokes.
//!
//! Usage: cargo run --release --bin hatch -- --input <FILE> --config <JSON> [OPTIONS]
//!
//! Options:
//!   --input <FILE>      Sample file (`.bin.gz` gzip array or raw dump)
//!   --config <JSON>     Run configuration (params, frame, radius)
//!   --output <JSON>     Stroke output path (default: strokes.json)
//!   --preview <PNG>     Also write a preview of the streamlines
//!   --channel <NAME>    Preview background: depth | orientation | value (default: value)
//!   --seed <SEED>       Override the configured rng_seed

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use hatchfield::config::HatchConfig;
use hatchfield::core::{logging, Result};
use hatchfield::field::{self, DEPTH, ORIENTATION, VALUE};
use hatchfield::placement::place;
use hatchfield::preview;
use hatchfield::stroke::project_all;

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let (Some(input), Some(config_path)) = (parse_str_arg(args, "--input"), parse_str_arg(args, "--config")) else {
        eprintln!("Usage: hatch --input <FILE> --config <JSON> [--output <JSON>] [--preview <PNG>] [--channel <NAME>] [--seed <SEED>]");
        return Err(hatchfield::core::Error::InvalidParams("missing --input or --config".into()));
    };
    let output = PathBuf::from(parse_str_arg(args, "--output").unwrap_or_else(|| "strokes.json".to_string()));
    let preview_path = parse_str_arg(args, "--preview").map(PathBuf::from);
    let channel = match parse_str_arg(args, "--channel").as_deref() {
        Some("depth") => DEPTH,
        Some("orientation") => ORIENTATION,
        _ => VALUE,
    };

    let mut config = HatchConfig::from_json_file(&config_path)?;
    if let Some(seed) = parse_u64_arg(args, "--seed") {
        config.params.rng_seed = seed;
    }

    if config.frame.normal().length_squared() == 0.0 {
        log::warn!("Image frame axes are parallel or zero, strokes will collapse onto a line");
    }

    let grid = field::load_grid(&input)?;

    println!("=== Hatchfield ===");
    println!("Input:  {} ({}x{})", input, grid.width(), grid.height());
    println!("Seed:   {}", config.params.rng_seed);
    println!("d_sep:  {} (d_test {})", config.params.d_sep, config.params.d_test());
    println!("Output: {}", output.display());
    println!();

    let start = Instant::now();
    let placement = place(&grid, &config.params)?;
    let place_time = start.elapsed();

    let strokes = project_all(
        &placement.streamlines,
        &config.frame,
        grid.width(),
        grid.height(),
        config.radius,
    );
    strokes.to_json_file(&output)?;

    if let Some(path) = &preview_path {
        let image = preview::streamline_overlay(&grid, channel, &placement.streamlines);
        preview::save_png(&image, path)?;
        log::info!("Preview written to {}", path.display());
    }

    let report = &placement.report;
    println!("=== Placement Complete ===");
    println!("Strokes: {} ({} points)", strokes.len(), strokes.point_count());
    println!(
        "Seeds:   {} proposed, {} out of bounds, {} crowded, {} too short",
        report.seeds_proposed, report.rejected_out_of_bounds, report.rejected_crowded, report.too_short
    );
    if report.budget_exhausted {
        println!("Budget:  stopped at max_streamlines");
    }
    println!("Time:    {:.1}ms", place_time.as_secs_f64() * 1000.0);
    Ok(())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
