use clap::Parser;
use std::path::PathBuf;

use crate::types::RunMode;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // Release builds carry the tag alone
    if let Some(tag) = option_env!("PG_VERSION_SYNC_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("PG_VERSION_SYNC_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("PG_VERSION_SYNC_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser, Debug)]
#[command(name = "pg-version-sync")]
#[command(
    about = "Keep PostgreSQL versions in sync with upstream releases",
    long_about = "Fetches PostgreSQL binary releases, picks the recommended versions for the \
                  supported window and updates the CI workflow, docker-bake.hcl, mise.toml \
                  and Dockerfiles to match."
)]
#[command(version = get_version())]
pub struct Cli {
    /// Check for updates without modifying files
    #[arg(long)]
    pub check: bool,

    /// Apply updates to files
    #[arg(long)]
    pub apply: bool,

    /// Repository checkout to operate on
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// `--check` takes precedence so that a combined invocation never writes.
    pub fn run_mode(&self) -> RunMode {
        if self.check {
            RunMode::Check
        } else if self.apply {
            RunMode::Apply
        } else {
            RunMode::Report
        }
    }
}
