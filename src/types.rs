use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A release tag made only of dot-separated numeric components, e.g. `17.6.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    tag: String,
    parts: Vec<u64>,
}

impl ReleaseVersion {
    /// Parse a tag. Returns `None` for anything that is not at least
    /// `major.minor` with purely numeric components.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let parts = tag
            .split('.')
            .map(|part| {
                if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<u64>().ok()
                } else {
                    None
                }
            })
            .collect::<Option<Vec<u64>>>()?;

        if parts.len() < 2 {
            return None;
        }

        Some(Self {
            tag: tag.to_string(),
            parts,
        })
    }

    pub fn major(&self) -> u64 {
        self.parts[0]
    }

    pub fn components(&self) -> &[u64] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Which recommendation shape, state source and CI signals a deployment uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Newest and oldest of the supported window, recorded in `.versions.json`.
    #[default]
    Pair,
    /// Newest, middle and oldest, recovered by scanning the CI workflow.
    Triple,
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pair" | "2" => Ok(Variant::Pair),
            "triple" | "3" => Ok(Variant::Triple),
            other => Err(format!(
                "unknown variant '{}', expected 'pair' or 'triple'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Print the recommendation and how to act on it
    Report,
    /// Emit CI signals, never write
    Check,
    /// Rewrite every target file
    Apply,
}

/// Contents of `.versions.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VersionRecord {
    #[serde(default)]
    pub newest: String,
    #[serde(default)]
    pub oldest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_version() {
        let v = ReleaseVersion::parse("17.6.1").unwrap();
        assert_eq!(v.major(), 17);
        assert_eq!(v.as_str(), "17.6.1");

        assert!(ReleaseVersion::parse("16.4").is_some());
        assert!(ReleaseVersion::parse("17").is_none());
        assert!(ReleaseVersion::parse("").is_none());
        assert!(ReleaseVersion::parse("v17.6.1").is_none());
        assert!(ReleaseVersion::parse("17.0.0-beta1").is_none());
        assert!(ReleaseVersion::parse("17..1").is_none());
        assert!(ReleaseVersion::parse("+17.1").is_none());
    }

    #[test]
    fn test_release_version_ordering_is_numeric() {
        let a = ReleaseVersion::parse("13.9").unwrap();
        let b = ReleaseVersion::parse("13.10").unwrap();
        let c = ReleaseVersion::parse("13.10.1").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("pair".parse::<Variant>().unwrap(), Variant::Pair);
        assert_eq!("Triple".parse::<Variant>().unwrap(), Variant::Triple);
        assert_eq!("3".parse::<Variant>().unwrap(), Variant::Triple);
        assert!("quad".parse::<Variant>().is_err());
    }

    #[test]
    fn test_version_record_tolerates_missing_fields() {
        let record: VersionRecord = serde_json::from_str(r#"{"newest": "18.2.0"}"#).unwrap();
        assert_eq!(record.newest, "18.2.0");
        assert_eq!(record.oldest, "");
    }
}
