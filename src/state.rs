//! Recorded version state
//!
//! The pair variant keeps `.versions.json` as the source of truth. The triple
//! variant has no record and recovers the current versions from the CI
//! workflow matrix instead.

use crate::config::Settings;
use crate::error::SyncError;
use crate::patch::ci_workflow::scan_versions;
use crate::policy::Recommendation;
use crate::repository::Repository;
use crate::types::{Variant, VersionRecord};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// What the repository currently believes is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedState {
    Record(VersionRecord),
    Scanned(Vec<String>),
}

impl RecordedState {
    pub fn version_set(&self) -> BTreeSet<String> {
        let versions: Vec<&String> = match self {
            RecordedState::Record(record) => vec![&record.newest, &record.oldest],
            RecordedState::Scanned(versions) => versions.iter().collect(),
        };
        versions
            .into_iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect()
    }

    /// Order does not matter, only the set of versions.
    pub fn matches(&self, recommendation: &Recommendation) -> bool {
        self.version_set() == recommendation.version_set()
    }
}

pub fn read_state<R: Repository + ?Sized>(repo: &R, settings: &Settings) -> Result<RecordedState> {
    match settings.variant {
        Variant::Pair => Ok(RecordedState::Record(read_record(
            repo,
            &settings.paths.versions_file,
        )?)),
        Variant::Triple => Ok(RecordedState::Scanned(scan_ci_versions(
            repo,
            &settings.paths.ci_workflow,
        )?)),
    }
}

/// Missing record means nothing is recorded yet.
pub fn read_record<R: Repository + ?Sized>(repo: &R, path: &Path) -> Result<VersionRecord> {
    let Some(content) = repo.read(path)? else {
        tracing::debug!("No version record at {}", path.display());
        return Ok(VersionRecord::default());
    };

    let record = serde_json::from_str(&content).map_err(|source| SyncError::InvalidRecord {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(record)
}

pub fn write_record<R: Repository + ?Sized>(
    repo: &mut R,
    path: &Path,
    recommendation: &Recommendation,
) -> Result<()> {
    let record = VersionRecord {
        newest: recommendation.newest().to_string(),
        oldest: recommendation.oldest().to_string(),
    };
    let content = serde_json::to_string_pretty(&record)? + "\n";
    repo.write(path, &content)
}

/// Missing workflow or missing matrix both yield an empty list.
pub fn scan_ci_versions<R: Repository + ?Sized>(repo: &R, path: &Path) -> Result<Vec<String>> {
    let versions = repo
        .read(path)?
        .map(|content| scan_versions(&content))
        .unwrap_or_default();
    if versions.is_empty() {
        tracing::debug!("No pg_version matrix found in {}", path.display());
    }
    Ok(versions)
}
