//! Local repository mirrors: idempotent clone-or-pull, cleanup, and
//! per-repository leases.
//!
//! Mirrors live under a fixed base directory keyed by repository name and
//! persist across requests until a successful run deletes them. Because two
//! concurrent runs for the same repository would race on clone/pull and on
//! cleanup, every run holds a [`MirrorLease`] for its repository from
//! synchronization through cleanup; runs for different repositories proceed
//! independently.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::command::CommandRunner;
use crate::coordinate::RepoCoordinate;
use crate::error::PipelineError;

pub struct MirrorStore {
    base: PathBuf,
    runner: CommandRunner,
}

impl MirrorStore {
    pub fn new(base: PathBuf, runner: CommandRunner) -> Self {
        Self { base, runner }
    }

    pub fn root_for(&self, repo: &str) -> PathBuf {
        self.base.join(repo)
    }

    /// Clone the repository if no mirror exists yet, otherwise update the
    /// existing checkout in place. Either path failing is fatal to the run.
    pub async fn synchronise(&self, coordinate: &RepoCoordinate) -> Result<(), PipelineError> {
        let target = self.root_for(&coordinate.repo);

        // Existence is probed by listing, so a file squatting on the path is
        // treated the same as a missing mirror.
        if tokio::fs::read_dir(&target).await.is_ok() {
            debug!(path = %target.display(), "Mirror already exists, pulling");
            self.pull(&target).await
        } else {
            tokio::fs::create_dir_all(&self.base).await.map_err(|e| {
                PipelineError::SyncFailure(format!(
                    "failed to create mirror base {}: {e}",
                    self.base.display()
                ))
            })?;
            self.clone_repo(coordinate).await
        }
    }

    async fn pull(&self, target: &std::path::Path) -> Result<(), PipelineError> {
        self.runner
            .run("git", &["pull"], Some(target))
            .await
            .map_err(|e| e.into_stage(PipelineError::SyncFailure))?;
        Ok(())
    }

    async fn clone_repo(&self, coordinate: &RepoCoordinate) -> Result<(), PipelineError> {
        let remote = format!(
            "https://{}/{}/{}.git",
            coordinate.provider, coordinate.owner, coordinate.repo
        );

        // Shallow single-branch clone: only the current tip is ever built.
        // A coordinate without a branch clones the remote default branch.
        let mut args = vec!["clone", remote.as_str()];
        if !coordinate.branch.is_empty() {
            args.extend(["-b", coordinate.branch.as_str()]);
        }
        args.extend(["--single-branch", "--depth", "1"]);

        info!(remote = %remote, branch = %coordinate.branch, "Cloning repository");
        self.runner
            .run("git", &args, Some(&self.base))
            .await
            .map_err(|e| e.into_stage(PipelineError::SyncFailure))?;
        Ok(())
    }

    /// Remove the mirror after a successful run. Best effort: a failure is
    /// logged and the next run for this repository re-synchronises anyway.
    pub async fn cleanup(&self, coordinate: &RepoCoordinate) {
        let target = self.root_for(&coordinate.repo);
        info!(path = %target.display(), "Cleaning up mirror");
        if let Err(e) = tokio::fs::remove_dir_all(&target).await {
            warn!(path = %target.display(), error = %e, "Failed to remove mirror");
        }
    }
}

/// Registry of per-repository locks.
#[derive(Default)]
pub struct MirrorLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MirrorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lease for a repository name, waiting for any concurrent
    /// run on the same mirror to finish first.
    pub async fn acquire(&self, repo: &str) -> MirrorLease {
        let lock = self.locks.entry(repo.to_string()).or_default().clone();
        MirrorLease {
            _guard: lock.lock_owned().await,
        }
    }
}

/// Held from synchronization through cleanup; dropping it releases the
/// repository for the next run.
#[derive(Debug)]
pub struct MirrorLease {
    _guard: OwnedMutexGuard<()>,
}
