//! GitHub Actions step outputs (`$GITHUB_OUTPUT`).

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Appends `key=value` lines to the output file when one is configured;
/// otherwise every call is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CiOutput {
    path: Option<PathBuf>,
}

impl CiOutput {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(GITHUB_OUTPUT_ENV)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        )
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open CI output file {}", path.display()))?;
        writeln!(file, "{}={}", key, value)?;
        tracing::debug!("CI output {}={}", key, value);
        Ok(())
    }
}
