//! `docker/Dockerfile.*`: the `POSTGRES_VERSION=<version>` default.
//!
//! Every discovered Dockerfile gets the oldest recommended version, whatever
//! major its name refers to.

use super::{cached_regex, TextPatch};
use crate::policy::Recommendation;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

static POSTGRES_VERSION: OnceLock<Regex> = OnceLock::new();

pub struct DockerfilePatch;

impl TextPatch for DockerfilePatch {
    fn name(&self) -> &'static str {
        "dockerfile"
    }

    fn rewrite(&self, content: &str, recommendation: &Recommendation) -> String {
        let replacement = format!("POSTGRES_VERSION={}", recommendation.oldest());
        cached_regex(&POSTGRES_VERSION, r"POSTGRES_VERSION=\d+(?:\.\d+)+")
            .replace_all(content, NoExpand(&replacement))
            .into_owned()
    }
}
