use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use immich_bootstrap::Pipeline;
use immich_bootstrap::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("IMMICH_BOOTSTRAP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("immich_bootstrap=debug")
        } else {
            EnvFilter::new("immich_bootstrap=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let settings = cli.settings().context("failed to load settings")?;

    let mut pipeline = Pipeline::new(settings);
    if cli.dry_run {
        pipeline = pipeline.dry_run();
    }

    if let Err(e) = pipeline.run() {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
