//! Pipeline orchestration: the ordered, fail-fast generation sequence.
//!
//! Parse → validate → lease → synchronise → resolve layout → detect format →
//! detect environment → provision → build → read artifact. Each stage's
//! failure maps to its [`PipelineError`] variant and returns immediately;
//! no stage is retried and no partial results are cached across attempts.
//! Milestones are published to the run's progress channel as they happen.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::command::CommandRunner;
use crate::config::AppConfig;
use crate::coordinate::{self, RepoCoordinate};
use crate::detect::{self, DocFormat};
use crate::environment::{self, EcosystemKind};
use crate::error::PipelineError;
use crate::github::RepoHost;
use crate::layout::{self, DirectoryLayout};
use crate::mirror::{MirrorLease, MirrorLocks, MirrorStore};
use crate::policy;
use crate::progress::{ProgressHub, ProgressPublisher};
use crate::sphinx;

/// Terminal value of a successful run. The lease keeps the mirror reserved
/// until the caller has finished cleanup.
#[derive(Debug)]
pub struct PipelineResult {
    pub coordinate: RepoCoordinate,
    pub layout: DirectoryLayout,
    pub artifact_path: PathBuf,
    pub artifact_bytes: Vec<u8>,
    pub lease: MirrorLease,
}

pub struct Pipeline {
    config: Arc<AppConfig>,
    host: Arc<dyn RepoHost>,
    hub: Arc<ProgressHub>,
    mirrors: MirrorStore,
    locks: MirrorLocks,
    runner: CommandRunner,
}

impl Pipeline {
    pub fn new(config: Arc<AppConfig>, host: Arc<dyn RepoHost>, hub: Arc<ProgressHub>) -> Self {
        let runner = CommandRunner::new(config.command_timeout());
        let mirrors = MirrorStore::new(config.mirror_dir.clone(), runner);
        Self {
            config,
            host,
            hub,
            mirrors,
            locks: MirrorLocks::new(),
            runner,
        }
    }

    /// Execute the full pipeline for one URL, publishing progress under the
    /// given run id.
    pub async fn run(&self, url: &str, run_id: &str) -> Result<PipelineResult, PipelineError> {
        let progress = ProgressPublisher::new(self.hub.clone(), run_id);

        let coordinate = coordinate::parse_repo_url(url)?;
        info!(
            owner = %coordinate.owner,
            repo = %coordinate.repo,
            branch = %coordinate.branch,
            directory = %coordinate.directory,
            "Parsed repository coordinate"
        );

        policy::validate(self.host.as_ref(), &coordinate.owner, &coordinate.repo).await?;

        let lease = self.locks.acquire(&coordinate.repo).await;

        progress.publish(format!(
            "Updating {}/{}/{}...",
            coordinate.provider, coordinate.owner, coordinate.repo
        ));
        self.mirrors.synchronise(&coordinate).await?;

        let layout = layout::resolve(&self.config.mirror_dir, &coordinate);

        let (format, evidence) = detect::detect_doc_format(&layout.doc_path())?;
        progress.publish(format!("Found {format} documentation: {evidence}"));

        progress.publish("Generating PDF...");
        let (ecosystem, _) = environment::detect_ecosystem(&layout.base)?;
        match ecosystem {
            EcosystemKind::Node => {
                return Err(PipelineError::UnsupportedCombination(
                    "node environment provisioning is not implemented".to_string(),
                ));
            }
            EcosystemKind::Python => {
                progress.publish("Parsing Python env...");
                let (dialect, _) = environment::detect_python_dialect(&layout.base)?;
                progress.publish("Setting up Python environment...");
                environment::provision_python(&self.runner, &layout.base, dialect).await?;
            }
        }

        let artifact_path = match format {
            DocFormat::Sphinx => sphinx::build(&self.runner, &coordinate, &layout, &progress).await?,
            other => {
                return Err(PipelineError::UnsupportedCombination(format!(
                    "no build driver implemented for {other} documentation"
                )));
            }
        };

        info!(path = %artifact_path.display(), "Reading PDF artifact");
        let artifact_bytes = tokio::fs::read(&artifact_path).await.map_err(|e| {
            PipelineError::ArtifactReadFailure(format!(
                "failed to read {}: {e}",
                artifact_path.display()
            ))
        })?;

        progress.publish("done!");
        Ok(PipelineResult {
            coordinate,
            layout,
            artifact_path,
            artifact_bytes,
            lease,
        })
    }

    /// Delete a repository's mirror. Called by the request handler after the
    /// response is written, while the run's lease is still held.
    pub async fn remove_mirror(&self, coordinate: &RepoCoordinate) {
        self.mirrors.cleanup(coordinate).await;
    }
}
