use clap::Parser;

mod cli;
mod commands;
mod git;
mod progress;
mod render;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("granary error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let config = granary_config::GranaryConfig::load_with_dotenv()?;

    match &cli.command {
        cli::Commands::Harvest(args) => commands::harvest::handle(args, &config, &flags).await,
        cli::Commands::Report(args) => commands::report::handle(args, &config, &flags),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GRANARY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
