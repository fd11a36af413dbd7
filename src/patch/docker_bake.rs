//! `docker/docker-bake.hcl`
//!
//! The whole `variable "PG_VERSIONS"` block is regenerated so keys for majors
//! that left the window disappear with it.

use super::{cached_regex, TextPatch};
use crate::policy::Recommendation;
use regex::{NoExpand, Regex};
use std::collections::BTreeSet;
use std::sync::OnceLock;

static PG_VERSIONS_BLOCK: OnceLock<Regex> = OnceLock::new();

pub struct DockerBakePatch;

/// Render the block, oldest major first, one key per major.
pub fn render_block(recommendation: &Recommendation) -> String {
    let mut seen = BTreeSet::new();
    let entries: String = recommendation
        .ascending()
        .filter(|v| seen.insert(v.major()))
        .map(|v| format!("    pg{} = \"{}\"\n", v.major(), v))
        .collect();

    format!(
        "variable \"PG_VERSIONS\" {{\n  default = {{\n{}  }}\n}}",
        entries
    )
}

impl TextPatch for DockerBakePatch {
    fn name(&self) -> &'static str {
        "docker-bake"
    }

    fn rewrite(&self, content: &str, recommendation: &Recommendation) -> String {
        let block = render_block(recommendation);
        cached_regex(
            &PG_VERSIONS_BLOCK,
            r#"(?s)variable "PG_VERSIONS" \{[^}]+\}[^}]*\}"#,
        )
        .replace_all(content, NoExpand(&block))
        .into_owned()
    }
}
