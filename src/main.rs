use anyhow::Context;
use clap::Parser;
use obstacle_processor::cli::{run, Cli};
use obstacle_processor::utils::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref()).context("Failed to initialise logging")?;
    run(cli).context("Obstacle processing failed")
}
