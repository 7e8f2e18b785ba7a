//! GitHub REST API access and token loading.
//!
//! The hosting API is consumed through the [`RepoHost`] trait so the policy
//! layer and the orchestrator can be exercised against a mock without network
//! access. The real client fetches `GET /repos/{owner}/{repo}` with bearer
//! authorization and interprets only `stargazers_count` and `created_at`.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo2pdf/", env!("CARGO_PKG_VERSION"));

/// Repository metadata relevant to the acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepoStats {
    pub stars: i64,
    pub age_years: f64,
}

/// Error type for host lookups (boxed, like the other trait seams).
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for fetching repository metadata from the hosting provider.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn repo_stats(&self, owner: &str, repo: &str) -> Result<RepoStats, HostError>;
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: i64,
    created_at: DateTime<Utc>,
}

/// Parse the repository metadata body and derive the repository age at `now`.
pub fn parse_repo_stats(body: &str, now: DateTime<Utc>) -> Result<RepoStats, serde_json::Error> {
    let response: RepoResponse = serde_json::from_str(body)?;
    let age_hours = (now - response.created_at).num_seconds() as f64 / 3600.0;
    Ok(RepoStats {
        stars: response.stargazers_count,
        age_years: age_hours / (24.0 * 365.25),
    })
}

/// GitHub client over the REST API.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl GithubClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn repo_stats(&self, owner: &str, repo: &str) -> Result<RepoStats, HostError> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        info!(url = %url, "Requesting repository metadata");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(format!("GitHub API returned {status} for {url}: {body}").into());
        }

        Ok(parse_repo_stats(&body, Utc::now())?)
    }
}

/// Load the GitHub token from the host-provided secret file, falling back to
/// the `GITHUB_TOKEN` environment variable. Secret files may be raw tokens or
/// `KEY=VALUE` lines.
pub fn load_github_token(secret_path: &Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(secret_path) {
        Ok(contents) => {
            let value = match contents.split_once('=') {
                Some((_, value)) => value,
                None => contents.as_str(),
            };
            let token = value.trim().to_string();
            if token.is_empty() {
                anyhow::bail!("secret file {} is empty", secret_path.display());
            }
            Ok(token)
        }
        Err(read_error) => {
            warn!(
                path = %secret_path.display(),
                error = %read_error,
                "Secret file unavailable, falling back to GITHUB_TOKEN env var"
            );
            std::env::var("GITHUB_TOKEN").map_err(|_| {
                anyhow::anyhow!(
                    "GITHUB_TOKEN not found in {} or the environment",
                    secret_path.display()
                )
            })
        }
    }
}
