use crate::types::Variant;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "pg-version-sync";
pub const SETTINGS_FILE_NAME: &str = ".pg-version-sync.yaml";

/// Releases are listed at most this many per page upstream.
pub const PAGE_SIZE: usize = 100;

pub const ENV_API_URL: &str = "PG_VERSION_SYNC_API_URL";
pub const ENV_VARIANT: &str = "PG_VERSION_SYNC_VARIANT";
pub const ENV_TIMEOUT_SECS: &str = "PG_VERSION_SYNC_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_upstream_repo")]
    pub upstream_repo: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_min_major")]
    pub min_major: u64,
    #[serde(default = "default_supported_majors")]
    pub supported_majors: usize,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub paths: PathSettings,
}

/// Target files, relative to the repository root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathSettings {
    #[serde(default = "default_versions_file")]
    pub versions_file: PathBuf,
    #[serde(default = "default_ci_workflow")]
    pub ci_workflow: PathBuf,
    #[serde(default = "default_docker_bake")]
    pub docker_bake: PathBuf,
    #[serde(default = "default_mise_toml")]
    pub mise_toml: PathBuf,
    #[serde(default = "default_dockerfile_dir")]
    pub dockerfile_dir: PathBuf,
    #[serde(default = "default_dockerfile_prefix")]
    pub dockerfile_prefix: String,
}

fn default_upstream_repo() -> String {
    "theseus-rs/postgresql-binaries".to_string()
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_min_major() -> u64 {
    13
}
fn default_supported_majors() -> usize {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_pages() -> u32 {
    1
}
fn default_versions_file() -> PathBuf {
    PathBuf::from(".versions.json")
}
fn default_ci_workflow() -> PathBuf {
    PathBuf::from(".github/workflows/ci.yml")
}
fn default_docker_bake() -> PathBuf {
    PathBuf::from("docker/docker-bake.hcl")
}
fn default_mise_toml() -> PathBuf {
    PathBuf::from("mise.toml")
}
fn default_dockerfile_dir() -> PathBuf {
    PathBuf::from("docker")
}
fn default_dockerfile_prefix() -> String {
    "Dockerfile.".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upstream_repo: default_upstream_repo(),
            api_url: default_api_url(),
            min_major: default_min_major(),
            supported_majors: default_supported_majors(),
            variant: Variant::default(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            paths: PathSettings::default(),
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            versions_file: default_versions_file(),
            ci_workflow: default_ci_workflow(),
            docker_bake: default_docker_bake(),
            mise_toml: default_mise_toml(),
            dockerfile_dir: default_dockerfile_dir(),
            dockerfile_prefix: default_dockerfile_prefix(),
        }
    }
}

pub fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Load settings for the checkout at `root`, then apply environment overrides.
pub fn load_settings(root: &Path) -> Result<Settings> {
    let settings_path = get_settings_file_path(root);
    tracing::debug!("Settings file path: {}", settings_path.display());

    let mut settings = if settings_path.exists() {
        let content = fs::read_to_string(&settings_path).with_context(|| {
            format!("Could not read settings file at {}", settings_path.display())
        })?;
        serde_yaml::from_str(&content).with_context(|| {
            format!("Could not parse settings file {} as YAML", settings_path.display())
        })?
    } else {
        Settings::default()
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    if settings.supported_majors == 0 {
        bail!(
            "supported_majors in {} must be at least 1",
            settings_path.display()
        );
    }
    Ok(settings)
}

fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL) {
        settings.api_url = url;
    }

    if let Some(variant) = lookup(ENV_VARIANT) {
        match variant.parse() {
            Ok(variant) => settings.variant = variant,
            Err(e) => tracing::warn!("Ignoring {}: {}", ENV_VARIANT, e),
        }
    }

    if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
        match secs.parse::<u64>() {
            Ok(secs) => settings.timeout_secs = secs,
            Err(_) => tracing::warn!("Ignoring {}: '{}' is not a number", ENV_TIMEOUT_SECS, secs),
        }
    }
}
