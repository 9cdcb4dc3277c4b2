use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `granary` binary.
#[derive(Debug, Parser)]
#[command(
    name = "granary",
    version,
    about = "crates.io catalog harvester and leaderboard reporter"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Global flags handed to command handlers.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFlags {
    pub quiet: bool,
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Harvest the full catalog into flat files
    Harvest(HarvestArgs),
    /// Render leaderboards from a harvested directory
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct HarvestArgs {
    /// Output directory (defaults to config `output.dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Items per list page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Registry sort order for list pages
    #[arg(long)]
    pub sort: Option<String>,

    /// Seconds to sleep after each page
    #[arg(long)]
    pub page_delay: Option<f64>,

    /// Seconds to sleep after each detail fetch
    #[arg(long)]
    pub detail_delay: Option<f64>,

    /// Retry attempts per fetch
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds between retry attempts
    #[arg(long)]
    pub backoff: Option<f64>,

    /// Skip per-crate detail fetches (no taxonomy enrichment)
    #[arg(long)]
    pub no_enrich: bool,

    /// Commit the output directory after the run
    #[arg(long)]
    pub commit: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Harvested data directory (defaults to config `output.dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows per leaderboard column
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Write the markdown to FILE instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
