//! Version selection policy
//!
//! Picks the recommended versions out of the supported window of a
//! [`Catalog`]. The window is the `supported_majors` highest majors, newest
//! first. The pair variant recommends its newest and oldest entry; the triple
//! variant adds the entry at position `len / 2`.

use crate::releases::Catalog;
use crate::types::{ReleaseVersion, Variant};
use std::collections::BTreeSet;

/// Recommended versions, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    variant: Variant,
    versions: Vec<ReleaseVersion>,
}

impl Recommendation {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn versions(&self) -> &[ReleaseVersion] {
        &self.versions
    }

    /// Oldest first
    pub fn ascending(&self) -> impl Iterator<Item = &ReleaseVersion> {
        self.versions.iter().rev()
    }

    pub fn newest(&self) -> &str {
        self.versions.first().map(|v| v.as_str()).unwrap_or("")
    }

    pub fn oldest(&self) -> &str {
        self.versions.last().map(|v| v.as_str()).unwrap_or("")
    }

    pub fn version_set(&self) -> BTreeSet<String> {
        self.versions.iter().map(|v| v.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

pub fn select(catalog: &Catalog, supported_majors: usize, variant: Variant) -> Recommendation {
    let window = catalog.supported_window(supported_majors);
    match variant {
        Variant::Pair => select_pair(&window),
        Variant::Triple => select_triple(&window),
    }
}

fn select_pair(window: &[&ReleaseVersion]) -> Recommendation {
    let versions = match (window.first(), window.last()) {
        (Some(newest), Some(oldest)) => vec![(*newest).clone(), (*oldest).clone()],
        _ => Vec::new(),
    };
    Recommendation {
        variant: Variant::Pair,
        versions,
    }
}

fn select_triple(window: &[&ReleaseVersion]) -> Recommendation {
    if window.len() < 3 {
        return Recommendation {
            variant: Variant::Triple,
            versions: window.iter().map(|v| (*v).clone()).collect(),
        };
    }

    let picks: BTreeSet<&ReleaseVersion> = [
        window[0],
        window[window.len() / 2],
        window[window.len() - 1],
    ]
    .into_iter()
    .collect();

    Recommendation {
        variant: Variant::Triple,
        versions: picks.into_iter().rev().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(tags: &[&str]) -> Catalog {
        Catalog::from_tags(tags.iter().copied(), 0)
    }

    fn strings(rec: &Recommendation) -> Vec<&str> {
        rec.versions().iter().map(|v| v.as_str()).collect()
    }

    const FULL: &[&str] = &[
        "18.2.0", "17.6.1", "16.10.0", "15.14.0", "14.19.0", "13.22.0",
    ];

    #[test]
    fn test_pair_uses_window_ends() {
        let rec = select(&catalog(FULL), 5, Variant::Pair);
        assert_eq!(rec.newest(), "18.2.0");
        assert_eq!(rec.oldest(), "14.19.0");
        assert_eq!(strings(&rec), vec!["18.2.0", "14.19.0"]);
    }

    #[test]
    fn test_pair_with_two_majors() {
        let rec = select(&catalog(&["17.6.1", "15.14.0"]), 5, Variant::Pair);
        assert_eq!(rec.newest(), "17.6.1");
        assert_eq!(rec.oldest(), "15.14.0");
    }

    #[test]
    fn test_pair_with_single_major_is_degenerate() {
        let rec = select(&catalog(&["17.6.1"]), 5, Variant::Pair);
        assert_eq!(rec.newest(), "17.6.1");
        assert_eq!(rec.oldest(), "17.6.1");
        assert_eq!(rec.version_set().len(), 1);
    }

    #[test]
    fn test_pair_with_empty_catalog() {
        let rec = select(&Catalog::default(), 5, Variant::Pair);
        assert!(rec.is_empty());
        assert_eq!(rec.newest(), "");
        assert_eq!(rec.oldest(), "");
    }

    #[test]
    fn test_triple_middle_is_positional() {
        let rec = select(&catalog(FULL), 5, Variant::Triple);
        assert_eq!(strings(&rec), vec!["18.2.0", "16.10.0", "14.19.0"]);
    }

    #[test]
    fn test_triple_middle_with_gapped_majors() {
        let rec = select(
            &catalog(&["18.1", "16.1", "14.1", "12.1", "10.1"]),
            5,
            Variant::Triple,
        );
        assert_eq!(strings(&rec), vec!["18.1", "14.1", "10.1"]);
    }

    #[test]
    fn test_triple_middle_with_four_majors() {
        let rec = select(
            &catalog(&["17.6.1", "16.10.0", "15.14.0", "14.19.0"]),
            5,
            Variant::Triple,
        );
        // position 4 / 2 = 2
        assert_eq!(strings(&rec), vec!["17.6.1", "15.14.0", "14.19.0"]);
    }

    #[test]
    fn test_triple_short_window_is_returned_as_is() {
        let rec = select(&catalog(&["17.6.1", "15.14.0"]), 5, Variant::Triple);
        assert_eq!(strings(&rec), vec!["17.6.1", "15.14.0"]);

        let rec = select(&catalog(&["17.6.1"]), 5, Variant::Triple);
        assert_eq!(strings(&rec), vec!["17.6.1"]);
        assert_eq!(rec.newest(), rec.oldest());
    }

    #[test]
    fn test_ascending_reverses_order() {
        let rec = select(&catalog(FULL), 5, Variant::Pair);
        let asc: Vec<&str> = rec.ascending().map(|v| v.as_str()).collect();
        assert_eq!(asc, vec!["14.19.0", "18.2.0"]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let c = catalog(FULL);
        for variant in [Variant::Pair, Variant::Triple] {
            assert_eq!(select(&c, 5, variant), select(&c, 5, variant));
        }
    }
}
