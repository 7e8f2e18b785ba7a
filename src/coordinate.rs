//! Repository coordinate parsing.
//!
//! A coordinate is the structured identity extracted from an input URL:
//! provider, owner, repository, branch and documentation sub-directory.
//! Supported URL shapes:
//!
//! - `https://github.com/apache/airflow`
//! - `https://github.com/apache/airflow/tree/main/airflow-core/docs`
//! - `https://github.com/apache/airflow/airflow-core/docs`
//!
//! At the bare three-segment arity no branch or directory defaults are
//! applied. With a longer path the branch segment defaults to `main` unless
//! an explicit `tree/<branch>` pair is present, and the directory defaults to
//! `docs` when nothing follows the branch boundary.

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    pub provider: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub directory: String,
}

pub fn parse_repo_url(url: &str) -> Result<RepoCoordinate, PipelineError> {
    let Some(rest) = url.strip_prefix("https://") else {
        return Err(PipelineError::InvalidInput(format!("invalid URL: {url}")));
    };

    if !url.contains("github.com") {
        return Err(PipelineError::InvalidInput(format!(
            "unsupported provider: {url}"
        )));
    }

    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let rest = rest.replacen("/tree/", "/", 1);

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() < 3 {
        return Err(PipelineError::InvalidInput(format!("invalid URL: {url}")));
    }

    let provider = parts[0].to_string();
    let owner = parts[1].to_string();
    let repo = parts[2].to_string();
    if owner.is_empty() || repo.is_empty() {
        return Err(PipelineError::InvalidInput(format!("invalid URL: {url}")));
    }

    if parts.len() == 3 {
        return Ok(RepoCoordinate {
            provider,
            owner,
            repo,
            branch: String::new(),
            directory: String::new(),
        });
    }

    // The fourth segment is the branch position. Its value only matters when
    // an explicit `tree/<branch>` pair survived normalization; otherwise the
    // branch is assumed to be `main` and the segment is skipped.
    let (branch, consumed) = match (parts.get(4), parts.get(5)) {
        (Some(&"tree"), Some(named)) => ((*named).to_string(), 2),
        _ => ("main".to_string(), 0),
    };

    let directory = if parts.len() == 4 + consumed {
        "docs".to_string()
    } else {
        parts[4 + consumed..].join("/")
    };

    Ok(RepoCoordinate {
        provider,
        owner,
        repo,
        branch,
        directory,
    })
}
