mod cli;
mod config;
mod error;
mod patch;
mod policy;
mod reconcile;
mod releases;
mod repository;
mod signal;
mod state;
mod types;


use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::load_settings;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::reconcile;
use releases::{github::token_from_env, ReleaseFetcher};
use repository::FsRepository;
use signal::CiOutput;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;

    let settings = load_settings(&cli.root)?;
    let mut repo = FsRepository::new(&cli.root);
    tracing::debug!("Operating on {}", repo.root().display());

    println!("Fetching versions from {}...", settings.upstream_repo);
    let fetcher = ReleaseFetcher::new(&settings, token_from_env())?;

    let spinner = fetch_spinner(cli.quiet);
    let catalog = fetcher.fetch_catalog().await;
    spinner.finish_and_clear();

    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let output = CiOutput::from_env();
    if let Err(e) = reconcile(&catalog, &settings, &mut repo, cli.run_mode(), &output) {
        tracing::error!("Reconciliation failed: {:#}", e);
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn fetch_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Querying release index");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
