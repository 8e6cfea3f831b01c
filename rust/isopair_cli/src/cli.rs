use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON tuning file (overrides the built-in constants)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect isotope pairs in one exported two-column peak table
    DetectTable {
        /// Tab-separated input table (m/z, intensity) with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Candidate output file (truncated on each run)
        #[arg(short, long)]
        output: PathBuf,

        /// Ion charge
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        charge: u32,

        /// Allowed mass-delta deviation
        #[arg(long)]
        deviation: f64,
    },

    /// Detect isotope pairs scan by scan across an MGF file
    Detect {
        /// Input MGF file
        #[arg(short, long)]
        input: PathBuf,

        /// Candidate stream output file (appended to on each run)
        #[arg(short, long)]
        output: PathBuf,

        /// Ion charge
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        charge: u32,

        /// Allowed mass-delta deviation
        #[arg(long)]
        deviation: f64,

        /// First scan index to process (0-based)
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Exclusive end scan index; defaults to the last scan
        #[arg(long)]
        end: Option<usize>,
    },

    /// Re-screen a candidate stream against the charge-1 reference delta
    Refilter {
        /// Candidate stream input file
        #[arg(short, long)]
        input: PathBuf,

        /// Filtered stream output file (appended to on each run)
        #[arg(short, long)]
        output: PathBuf,

        /// Allowed deviation from the reference delta
        #[arg(long)]
        deviation: f64,
    },

    /// Group a candidate stream into tracks and write the retained m/z keys
    Group {
        /// Candidate stream input file
        #[arg(short, long)]
        input: PathBuf,

        /// Retained-key CSV output file
        #[arg(short, long)]
        output: PathBuf,

        /// m/z tolerance for joining a track
        #[arg(long)]
        mz_tolerance: f64,

        /// Minimum signal-to-noise ratio of a retained track
        #[arg(long)]
        sn_threshold: f64,

        /// Minimum member count of a retained track
        #[arg(long, default_value_t = 5)]
        min_group_size: usize,
    },
}
