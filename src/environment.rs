//! Language ecosystem detection and Python environment provisioning.
//!
//! Like documentation formats, ecosystems and package-manager dialects are
//! classified by ordered suffix rule tables over the base directory's
//! entries. Provisioning always creates an isolated virtual environment
//! first, then converges every dialect on `uv sync` semantics: pip installs
//! into the venv, uv syncs the lock file, and Poetry projects are migrated
//! to the uv lock format before syncing.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::command::CommandRunner;
use crate::detect::list_entry_names;
use crate::error::{CommandError, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcosystemKind {
    Python,
    Node,
}

impl fmt::Display for EcosystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EcosystemKind::Python => "python",
            EcosystemKind::Node => "node",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonDialect {
    Pip,
    Poetry,
    Uv,
}

const ECOSYSTEM_RULES: &[(&str, EcosystemKind)] = &[
    ("package.json", EcosystemKind::Node),
    ("requirements.txt", EcosystemKind::Python),
    ("poetry.lock", EcosystemKind::Python),
    ("uv.lock", EcosystemKind::Python),
    ("pyproject.toml", EcosystemKind::Python),
];

/// Dialect priority: a requirements file beats a uv lock beats Poetry
/// evidence, regardless of directory order.
const DIALECT_RULES: &[(&str, PythonDialect)] = &[
    ("requirements.txt", PythonDialect::Pip),
    ("uv.lock", PythonDialect::Uv),
    ("poetry.lock", PythonDialect::Poetry),
    ("pyproject.toml", PythonDialect::Poetry),
];

pub fn detect_ecosystem(base: &Path) -> Result<(EcosystemKind, String), PipelineError> {
    match_rules(base, ECOSYSTEM_RULES, "build environment")
}

pub fn detect_python_dialect(base: &Path) -> Result<(PythonDialect, String), PipelineError> {
    match_rules(base, DIALECT_RULES, "python environment")
}

fn match_rules<T: Copy>(
    base: &Path,
    rules: &[(&str, T)],
    what: &str,
) -> Result<(T, String), PipelineError> {
    let entries = list_entry_names(base).map_err(|e| {
        PipelineError::DetectionFailure(format!(
            "failed to list base directory {}: {e}",
            base.display()
        ))
    })?;

    for (suffix, kind) in rules {
        if let Some(name) = entries.iter().find(|name| name.ends_with(suffix)) {
            info!(evidence = %name, "Detected {what}");
            return Ok((*kind, name.clone()));
        }
    }

    Err(PipelineError::DetectionFailure(format!(
        "unknown {what} in {}",
        base.display()
    )))
}

/// Provision an isolated Python environment in `base` for the given dialect.
/// Any step failing aborts provisioning; no alternate dialect is attempted.
pub async fn provision_python(
    runner: &CommandRunner,
    base: &Path,
    dialect: PythonDialect,
) -> Result<(), PipelineError> {
    runner
        .run("uv", &["venv"], Some(base))
        .await
        .map_err(provision_error)?;

    match dialect {
        PythonDialect::Pip => {
            runner
                .run("uv", &["pip", "install", "-r", "requirements.txt"], Some(base))
                .await
                .map_err(provision_error)?;
        }
        PythonDialect::Uv => {
            runner
                .run("uv", &["sync"], Some(base))
                .await
                .map_err(provision_error)?;
        }
        PythonDialect::Poetry => {
            // Normalize onto the uv lock format so every dialect ends at the
            // same sync primitive.
            runner
                .run("uvx", &["migrate-to-uv"], Some(base))
                .await
                .map_err(provision_error)?;
            runner
                .run("uv", &["sync"], Some(base))
                .await
                .map_err(provision_error)?;
        }
    }

    info!(base = %base.display(), ?dialect, "Python environment provisioned");
    Ok(())
}

fn provision_error(e: CommandError) -> PipelineError {
    e.into_stage(PipelineError::ProvisionFailure)
}
