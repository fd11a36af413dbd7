//! File patch engine
//!
//! Each target file kind has one [`TextPatch`] that locates its version
//! fields by a fixed textual pattern and substitutes the recommendation.
//! Text outside the matched spans is left byte-for-byte intact, and a file is
//! only written when the rewritten text differs from what is on disk.

pub mod ci_workflow;
pub mod docker_bake;
pub mod dockerfile;
pub mod mise;

pub use ci_workflow::CiWorkflowPatch;
pub use docker_bake::DockerBakePatch;
pub use dockerfile::DockerfilePatch;
pub use mise::MiseVersionsPatch;

use crate::policy::Recommendation;
use crate::repository::Repository;
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub trait TextPatch {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Return `content` with every recognised version field replaced.
    /// Content without a match comes back unchanged.
    fn rewrite(&self, content: &str, recommendation: &Recommendation) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub label: String,
    pub changed: bool,
}

impl FileReport {
    pub fn new(label: impl Into<String>, changed: bool) -> Self {
        Self {
            label: label.into(),
            changed,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.changed {
            "updated"
        } else {
            "no changes"
        }
    }
}

/// Patch a single file. Returns whether it was written.
pub fn apply_patch<R: Repository + ?Sized>(
    repo: &mut R,
    path: &Path,
    patch: &dyn TextPatch,
    recommendation: &Recommendation,
) -> Result<bool> {
    if recommendation.is_empty() {
        tracing::warn!("Empty recommendation, leaving {} untouched", path.display());
        return Ok(false);
    }

    let content = repo.read_required(path)?;
    let updated = patch.rewrite(&content, recommendation);

    if updated == content {
        tracing::info!("{}: {} already up to date", patch.name(), path.display());
        return Ok(false);
    }

    repo.write(path, &updated)?;
    tracing::info!("{}: updated {}", patch.name(), path.display());
    Ok(true)
}

/// Patch every file in a batch; the batch changed if any file changed.
pub fn apply_patch_all<R: Repository + ?Sized>(
    repo: &mut R,
    paths: &[PathBuf],
    patch: &dyn TextPatch,
    recommendation: &Recommendation,
) -> Result<bool> {
    let mut changed = false;
    for path in paths {
        changed |= apply_patch(repo, path, patch, recommendation)?;
    }
    Ok(changed)
}

fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("patch pattern is a valid regex"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::policy::{select, Recommendation};
    use crate::releases::Catalog;
    use crate::types::Variant;

    pub const CATALOG_TAGS: &[&str] = &[
        "18.2.0", "17.6.1", "16.10.0", "15.14.0", "14.19.0", "13.22.0", "12.5.0",
    ];

    pub fn recommendation(variant: Variant) -> Recommendation {
        let catalog = Catalog::from_tags(CATALOG_TAGS.iter().copied(), 13);
        select(&catalog, 5, variant)
    }

    pub fn recommendation_from(tags: &[&str], variant: Variant) -> Recommendation {
        let catalog = Catalog::from_tags(tags.iter().copied(), 13);
        select(&catalog, 5, variant)
    }
}
