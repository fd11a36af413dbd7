//! Upstream release catalog
//!
//! Reduces the raw upstream release listing to the latest patch release of
//! every major version at or above the configured floor.

pub mod github;

pub use github::ReleaseFetcher;

use crate::types::{GitHubRelease, ReleaseVersion};
use std::collections::BTreeMap;

/// Highest release seen for each major version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    latest_by_major: BTreeMap<u64, ReleaseVersion>,
}

impl Catalog {
    /// Build a catalog from raw tags, dropping malformed tags and majors
    /// below `min_major`.
    pub fn from_tags<I, S>(tags: I, min_major: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Catalog::default();
        for tag in tags {
            let tag = tag.as_ref();
            match ReleaseVersion::parse(tag) {
                Some(version) if version.major() >= min_major => catalog.insert(version),
                Some(_) => tracing::trace!("Skipping {} below major {}", tag, min_major),
                None => tracing::trace!("Skipping malformed release tag '{}'", tag),
            }
        }
        catalog
    }

    pub fn from_releases(releases: &[GitHubRelease], min_major: u64) -> Self {
        Self::from_tags(
            releases
                .iter()
                .filter_map(|r| r.tag_name.as_deref())
                .filter(|tag| !tag.is_empty()),
            min_major,
        )
    }

    /// Keep `version` if its numeric components are strictly greater than
    /// what is held for its major. Equal tuples keep the first one seen.
    pub fn insert(&mut self, version: ReleaseVersion) {
        let major = version.major();
        match self.latest_by_major.get(&major) {
            Some(existing) if existing.components() >= version.components() => {}
            _ => {
                self.latest_by_major.insert(major, version);
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, major: u64) -> Option<&ReleaseVersion> {
        self.latest_by_major.get(&major)
    }

    pub fn is_empty(&self) -> bool {
        self.latest_by_major.is_empty()
    }

    pub fn len(&self) -> usize {
        self.latest_by_major.len()
    }

    /// The `size` highest majors, newest first.
    pub fn supported_window(&self, size: usize) -> Vec<&ReleaseVersion> {
        self.latest_by_major.values().rev().take(size).collect()
    }
}
