mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use isopair::PairConstraints;
use isopair::ScanRange;
use isopair::grouping::TrackFilter;

use cli::{
    Cli,
    Command,
};
use config::Config;

fn require_non_negative(name: &str, value: f64) -> std::result::Result<(), errors::CliError> {
    if !value.is_finite() || value < 0.0 {
        return Err(errors::CliError::Config {
            source: format!("{} must be a non-negative number, got {}", name, value),
        });
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> std::result::Result<(), errors::CliError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(errors::CliError::Config {
            source: format!("{} must be a positive number, got {}", name, value),
        });
    }
    Ok(())
}

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    // Parse command line arguments
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => {
            let config = Config::from_path(path)?;
            info!("Parsed tuning config: {:#?}", config);
            config
        }
        None => Config::default(),
    };

    match args.command {
        Command::DetectTable {
            input,
            output,
            charge,
            deviation,
        } => {
            require_non_negative("deviation", deviation)?;
            let mut constraints = PairConstraints::flat_table(charge, deviation);
            config.apply_detection(&mut constraints);
            processing::run_detect_table(&input, &output, &constraints)
        }
        Command::Detect {
            input,
            output,
            charge,
            deviation,
            start,
            end,
        } => {
            require_non_negative("deviation", deviation)?;
            let mut constraints = PairConstraints::streaming(charge, deviation);
            config.apply_detection(&mut constraints);
            processing::run_detect(&input, &output, &constraints, ScanRange { start, end })
        }
        Command::Refilter {
            input,
            output,
            deviation,
        } => {
            require_non_negative("deviation", deviation)?;
            processing::run_refilter(&input, &output, config.refilter_reference(), deviation)
        }
        Command::Group {
            input,
            output,
            mz_tolerance,
            sn_threshold,
            min_group_size,
        } => {
            require_positive("mz-tolerance", mz_tolerance)?;
            require_positive("sn-threshold", sn_threshold)?;
            let filter = TrackFilter {
                min_group_size,
                sn_threshold,
            };
            processing::run_group(&input, &output, mz_tolerance, &filter)
        }
    }
}
