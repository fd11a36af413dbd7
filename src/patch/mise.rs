//! `mise.toml`: the `VERSIONS=("..." "...")` list used by the test matrix task.

use super::{cached_regex, TextPatch};
use crate::policy::Recommendation;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

static VERSIONS_LIST: OnceLock<Regex> = OnceLock::new();

pub struct MiseVersionsPatch;

impl TextPatch for MiseVersionsPatch {
    fn name(&self) -> &'static str {
        "mise"
    }

    fn rewrite(&self, content: &str, recommendation: &Recommendation) -> String {
        let quoted = recommendation
            .ascending()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(" ");
        let replacement = format!("VERSIONS=({})", quoted);

        // One to three entries; a single-major window writes a one-entry list
        cached_regex(
            &VERSIONS_LIST,
            r#"VERSIONS=\("[\d.]+"(?:\s+"[\d.]+"){0,2}\s*\)"#,
        )
        .replace_all(content, NoExpand(&replacement))
        .into_owned()
    }
}
