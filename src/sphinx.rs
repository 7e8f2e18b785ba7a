//! Sphinx build driver: compatibility patch, LaTeX render, PDF conversion.
//!
//! The only documentation format with a working driver. The build renders
//! LaTeX through `sphinx-build` inside the provisioned environment's `docs`
//! dependency group, then compiles the first generated `.tex` file with a
//! single non-interactive `pdflatex` pass named after the coordinate.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::command::CommandRunner;
use crate::coordinate::RepoCoordinate;
use crate::error::PipelineError;
use crate::layout::DirectoryLayout;
use crate::progress::ProgressPublisher;

const SPHINX_EXTS_DIR: &str = "devel-common/src/sphinx_exts";
const FRAGILE_VERSION_LOOKUP: &str = "version = substitution_defs[\"version\"].astext()";
const SAFE_VERSION_LOOKUP: &str = "version = substitution_defs.get(\"version\", \"unknown\")";

/// Rewrite the unconditional version-substitution lookup in the repository's
/// Sphinx extension support file to a default-valued one. Upstream indexes
/// the substitution dict for a key that shallow checkouts don't define,
/// which aborts the whole build. Skipped silently when the file is absent.
pub async fn patch_substitution_extensions(root: &Path) -> Result<(), PipelineError> {
    let ext_dir = root.join(SPHINX_EXTS_DIR);
    let mut entries = match tokio::fs::read_dir(&ext_dir).await {
        Ok(entries) => entries,
        Err(_) => {
            debug!(path = %ext_dir.display(), "No sphinx extension directory, skipping patch");
            return Ok(());
        }
    };

    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        PipelineError::BuildFailure(format!("failed to scan {}: {e}", ext_dir.display()))
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.contains("substitution_extensions.py") {
            continue;
        }

        let path = entry.path();
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            PipelineError::BuildFailure(format!("failed to read {}: {e}", path.display()))
        })?;
        if !contents.contains(FRAGILE_VERSION_LOOKUP) {
            continue;
        }

        info!(path = %path.display(), "Patching fragile version substitution lookup");
        let patched = contents.replace(FRAGILE_VERSION_LOOKUP, SAFE_VERSION_LOOKUP);
        tokio::fs::write(&path, patched).await.map_err(|e| {
            PipelineError::BuildFailure(format!("failed to write {}: {e}", path.display()))
        })?;
    }

    Ok(())
}

/// Lexicographically first `.tex` file in the LaTeX output directory.
async fn first_tex_file(latex_dir: &Path) -> Result<String, PipelineError> {
    let mut entries = tokio::fs::read_dir(latex_dir).await.map_err(|e| {
        PipelineError::BuildFailure(format!(
            "no LaTeX output directory at {}: {e}",
            latex_dir.display()
        ))
    })?;

    let mut tex_files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        PipelineError::BuildFailure(format!("failed to scan {}: {e}", latex_dir.display()))
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".tex") {
            tex_files.push(name);
        }
    }
    tex_files.sort();

    tex_files.into_iter().next().ok_or_else(|| {
        PipelineError::BuildFailure(format!(
            "sphinx-build produced no .tex file in {}",
            latex_dir.display()
        ))
    })
}

/// Drive the full Sphinx build and return the PDF artifact path.
pub async fn build(
    runner: &CommandRunner,
    coordinate: &RepoCoordinate,
    layout: &DirectoryLayout,
    progress: &ProgressPublisher,
) -> Result<PathBuf, PipelineError> {
    patch_substitution_extensions(&layout.root).await?;

    progress.publish("Generating docs as Latex...");
    let output = runner
        .run(
            "uv",
            &[
                "run",
                "--group",
                "docs",
                "sphinx-build",
                "-M",
                "latex",
                layout.doc.as_str(),
                "_build/",
            ],
            Some(&layout.base),
        )
        .await
        .map_err(|e| e.into_stage(PipelineError::BuildFailure))?;
    debug!(
        stdout = %String::from_utf8_lossy(&output.stdout),
        "sphinx-build finished"
    );

    let latex_dir = layout.base.join("_build").join("latex");
    let tex_file = first_tex_file(&latex_dir).await?;
    let job_name = format!(
        "{}_{}",
        coordinate.repo,
        coordinate.directory.replace('/', "_")
    );

    progress.publish("Converting Latex to PDF...");
    let job_arg = format!("-jobname={job_name}");
    let output = runner
        .run_unchecked(
            "pdflatex",
            &["-interaction=nonstopmode", job_arg.as_str(), tex_file.as_str()],
            Some(&latex_dir),
        )
        .await
        .map_err(|e| e.into_stage(PipelineError::BuildFailure))?;

    // A first pdflatex pass routinely reports recoverable warnings as a
    // non-zero exit while still writing a usable PDF. The artifact read
    // below is the real success check.
    if !output.status.success() {
        warn!(
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "pdflatex exited non-zero, continuing"
        );
    }

    let pdf_path = latex_dir.join(format!("{job_name}.pdf"));
    info!(path = %pdf_path.display(), "PDF artifact path");
    Ok(pdf_path)
}
