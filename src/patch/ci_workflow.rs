//! `.github/workflows/ci.yml`
//!
//! Two independent fields: the `pg_version: [...]` matrix list and the
//! `postgres-binary:postgres@<version>` reference that pins the oldest version.

use super::{cached_regex, TextPatch};
use crate::policy::Recommendation;
use regex::{Captures, NoExpand, Regex};
use std::sync::OnceLock;

static VERSION_LIST: OnceLock<Regex> = OnceLock::new();
static BINARY_REF: OnceLock<Regex> = OnceLock::new();
static QUOTED: OnceLock<Regex> = OnceLock::new();

fn version_list() -> &'static Regex {
    cached_regex(&VERSION_LIST, r"(pg_version:\s*\[)([^\]]+)(\])")
}

fn binary_ref() -> &'static Regex {
    cached_regex(&BINARY_REF, r"postgres-binary:postgres@\d+(?:\.\d+)+")
}

pub struct CiWorkflowPatch;

impl TextPatch for CiWorkflowPatch {
    fn name(&self) -> &'static str {
        "ci-workflow"
    }

    fn rewrite(&self, content: &str, recommendation: &Recommendation) -> String {
        let list = recommendation
            .versions()
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(", ");

        let content = version_list().replace_all(content, |caps: &Captures| {
            format!("{}{}{}", &caps[1], list, &caps[3])
        });

        let pinned = format!("postgres-binary:postgres@{}", recommendation.oldest());
        binary_ref()
            .replace_all(&content, NoExpand(&pinned))
            .into_owned()
    }
}

/// Versions listed in the first `pg_version` matrix entry; empty when absent.
pub fn scan_versions(content: &str) -> Vec<String> {
    let Some(caps) = version_list().captures(content) else {
        return Vec::new();
    };
    let quoted = cached_regex(&QUOTED, r#""([^"]*)""#);
    quoted
        .captures_iter(&caps[2])
        .map(|c| c[1].to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
