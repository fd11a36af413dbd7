//! GitHub API interaction module
//!
//! Lists the releases of the upstream binaries repository and turns them
//! into a [`Catalog`].

use super::Catalog;
use crate::config::{Settings, APP_NAME, PAGE_SIZE};
use crate::error::SyncError;
use crate::types::GitHubRelease;
use std::time::Duration;

pub struct ReleaseFetcher {
    client: reqwest::Client,
    api_url: String,
    repo: String,
    min_major: u64,
    max_pages: u32,
    token: Option<String>,
}

/// Build the releases listing URL for one page
pub fn build_releases_url(api_url: &str, repo: &str, page: u32) -> String {
    format!(
        "{}/repos/{}/releases?per_page={}&page={}",
        api_url.trim_end_matches('/'),
        repo,
        PAGE_SIZE,
        page
    )
}

/// Token for the GitHub API, if the environment carries one
pub fn token_from_env() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|token| !token.trim().is_empty())
}

impl ReleaseFetcher {
    pub fn new(settings: &Settings, token: Option<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SyncError::unavailable(&settings.upstream_repo, e))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            repo: settings.upstream_repo.clone(),
            min_major: settings.min_major,
            max_pages: settings.max_pages.max(1),
            token,
        })
    }

    /// Fetch every page of the listing and reduce it to a catalog.
    ///
    /// An empty catalog is reported as [`SyncError::EmptyCatalog`] so callers
    /// never act on a listing without usable releases.
    pub async fn fetch_catalog(&self) -> Result<Catalog, SyncError> {
        let mut releases = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self.fetch_page(page).await?;
            let count = batch.len();
            releases.extend(batch);
            if count < PAGE_SIZE {
                break;
            }
        }

        tracing::debug!("Fetched {} releases from {}", releases.len(), self.repo);

        let catalog = Catalog::from_releases(&releases, self.min_major);
        if catalog.is_empty() {
            return Err(SyncError::EmptyCatalog {
                repo: self.repo.clone(),
            });
        }
        Ok(catalog)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<GitHubRelease>, SyncError> {
        let url = build_releases_url(&self.api_url, &self.repo, page);
        tracing::debug!("Fetching GitHub releases from: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
            tracing::debug!("Using GitHub token");
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::unavailable(&self.repo, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::warn!("GitHub API returned status {}: {}", status, url);
            return Err(SyncError::unavailable(
                &self.repo,
                format!("{} - {}", status, error_text.trim()),
            ));
        }

        response.json::<Vec<GitHubRelease>>().await.map_err(|e| {
            tracing::warn!("Failed to parse GitHub releases response: {}", e);
            SyncError::unavailable(&self.repo, e)
        })
    }
}
