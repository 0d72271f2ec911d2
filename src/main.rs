//! Command line front end: read a JSON optimization request, order its stops
//! and report the result.

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use route_optimizer::config::Algorithm;
use route_optimizer::utils::{load_request, parse_time_limit, save_result, RunSummary};
use route_optimizer::RouteOptimizer;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "route-optimizer")]
#[command(version)]
#[command(about = "Order geographic stops into a short delivery route")]
struct Cli {
    /// JSON request with stops and optional constraints and config
    #[arg(short, long)]
    input: PathBuf,

    /// default (2-opt), genetic, simulated_annealing or multi_objective
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Decompose the stops into proximity clusters of this radius (km)
    #[arg(long)]
    cluster_radius: Option<f64>,

    /// Include the leg back to the first stop
    #[arg(long)]
    return_to_start: bool,

    /// Write the result as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = Builder::new();
    builder.filter_level(level).target(Target::Stderr);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger installed by an embedding process wins.
    let _ = builder.try_init();
}

fn run(cli: Cli) -> route_optimizer::Result<()> {
    let request = load_request(&cli.input)?;
    let mut config = request.config.clone();

    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(seconds) = cli.time_limit {
        config.time_limit = Some(parse_time_limit(seconds)?);
    }
    if let Some(radius_km) = cli.cluster_radius {
        let clustering = config.clustering.unwrap_or_default();
        config.clustering = Some(clustering.with_radius_km(radius_km));
    }
    if cli.return_to_start {
        config.return_to_start = true;
    }

    log::info!(
        "loaded {} stops from {}",
        request.stops.len(),
        cli.input.display()
    );

    let optimizer = RouteOptimizer::new(config)?;
    let result = optimizer.optimize(&request.stops, &request.constraints)?;

    println!("{}", RunSummary::new(&result).format());

    if let Some(path) = &cli.output {
        save_result(&result, path)?;
        log::info!("result written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
