//! Acceptance policy: only large, established repositories are built.
//!
//! The thresholds are intentionally conservative. Documentation builds run
//! arbitrary project tooling, so heavy work is bounded to projects that are
//! popular enough to be worth the cost.

use tracing::info;

use crate::error::PipelineError;
use crate::github::{RepoHost, RepoStats};

const MIN_STARS: i64 = 100;
const MIN_STARS_NEW_REPO: i64 = 1000;
const MIN_AGE_YEARS: f64 = 1.0;

/// Apply the star/age thresholds to already-fetched stats.
pub fn evaluate(stats: &RepoStats) -> Result<(), String> {
    if stats.stars < MIN_STARS {
        return Err(format!("repo has less than {MIN_STARS} stars"));
    }

    if stats.age_years < MIN_AGE_YEARS && stats.stars < MIN_STARS_NEW_REPO {
        return Err(format!(
            "repo is less than {MIN_AGE_YEARS} years old and has less than {MIN_STARS_NEW_REPO} stars"
        ));
    }

    Ok(())
}

/// Fetch repository metadata and enforce the acceptance policy. Any API or
/// parse failure is a validation failure; nothing is retried.
pub async fn validate(host: &dyn RepoHost, owner: &str, repo: &str) -> Result<(), PipelineError> {
    let stats = host.repo_stats(owner, repo).await.map_err(|e| {
        PipelineError::PolicyRejected(format!("repository metadata lookup failed: {e}"))
    })?;

    evaluate(&stats).map_err(PipelineError::PolicyRejected)?;

    info!(
        owner,
        repo,
        stars = stats.stars,
        age_years = stats.age_years,
        "Repository accepted"
    );
    Ok(())
}
