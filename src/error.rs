//! Pipeline error taxonomy and subprocess error plumbing.
//!
//! Every stage failure maps onto exactly one [`PipelineError`] variant, so the
//! HTTP layer can render a stage-tagged message without inspecting stage
//! internals. Nothing is retried; the only tolerated failure is a non-zero
//! `pdflatex` exit, handled inside the Sphinx driver.

use std::process::ExitStatus;

/// Terminal error type for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Malformed URL or unsupported provider.
    #[error("invalid request: {0}")]
    InvalidInput(String),
    /// Acceptance policy thresholds not met, or repository metadata lookup failed.
    #[error("repository validation failed: {0}")]
    PolicyRejected(String),
    /// Clone or pull of the local mirror failed.
    #[error("repository sync failed: {0}")]
    SyncFailure(String),
    /// Documentation format or language ecosystem could not be determined.
    #[error("detection failed: {0}")]
    DetectionFailure(String),
    /// Detected but unimplemented ecosystem or documentation format.
    #[error("unsupported configuration: {0}")]
    UnsupportedCombination(String),
    /// Virtual environment creation or dependency sync failed.
    #[error("environment provisioning failed: {0}")]
    ProvisionFailure(String),
    /// Documentation tool or LaTeX conversion failed.
    #[error("documentation build failed: {0}")]
    BuildFailure(String),
    /// Build reported success but the artifact is missing or unreadable.
    #[error("artifact read failed: {0}")]
    ArtifactReadFailure(String),
    /// An external command exceeded its wall-clock deadline.
    #[error("external command timed out: {0}")]
    Timeout(String),
}

/// Failure modes of a single external-command invocation.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exceeded the {timeout_secs}s deadline")]
    Timeout { command: String, timeout_secs: u64 },
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl CommandError {
    /// Map a command failure into the pipeline taxonomy: timeouts keep their
    /// own variant, everything else is wrapped by the stage's constructor.
    pub fn into_stage(self, wrap: fn(String) -> PipelineError) -> PipelineError {
        let message = self.to_string();
        match self {
            CommandError::Timeout { .. } => PipelineError::Timeout(message),
            _ => wrap(message),
        }
    }
}
