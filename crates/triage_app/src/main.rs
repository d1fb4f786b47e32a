mod config;
mod console;
mod logging;

use std::path::PathBuf;

use clap::Parser;

/// Headless live view of an analysis review page.
#[derive(Debug, Parser)]
#[command(name = "triage", version)]
struct Cli {
    /// RON configuration file.
    #[arg(short, long, default_value = "triage.ron")]
    config: PathBuf,

    /// Start with auto-refresh paused.
    #[arg(long)]
    paused: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::ConsoleConfig::load(&cli.config)?;
    logging::initialize(
        triage_logging::parse_level(&config.log_level),
        config.log_file.as_deref(),
    );
    console::run(config, !cli.paused).await
}
