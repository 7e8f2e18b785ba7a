//! Documentation format detection.
//!
//! Classification is an ordered rule table over filename suffixes: the first
//! rule any directory entry matches wins, so a directory carrying both a
//! Sphinx index and an MkDocs config resolves to Sphinx. Detection succeeding
//! does not imply a build driver exists; the orchestrator decides that
//! separately.

use std::fmt;
use std::path::Path;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Sphinx,
    MkDocs,
    Docusaurus,
    GitBook,
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocFormat::Sphinx => "sphinx",
            DocFormat::MkDocs => "mkdocs",
            DocFormat::Docusaurus => "docusaurus",
            DocFormat::GitBook => "gitbook",
        };
        f.write_str(name)
    }
}

/// Suffix evidence for each format, scanned in order.
const FORMAT_RULES: &[(&str, DocFormat)] = &[
    ("conf.py", DocFormat::Sphinx),
    ("index.rst", DocFormat::Sphinx),
    ("mkdocs.yml", DocFormat::MkDocs),
    ("mkdocs.yaml", DocFormat::MkDocs),
    ("docusaurus.config.js", DocFormat::Docusaurus),
    ("gitbook.yml", DocFormat::GitBook),
    ("gitbook.yaml", DocFormat::GitBook),
];

/// Classify the documentation directory, returning the matched format and
/// the filename that served as evidence.
pub fn detect_doc_format(doc_dir: &Path) -> Result<(DocFormat, String), PipelineError> {
    let entries = list_entry_names(doc_dir).map_err(|e| {
        PipelineError::DetectionFailure(format!(
            "failed to list documentation directory {}: {e}",
            doc_dir.display()
        ))
    })?;

    for (suffix, format) in FORMAT_RULES {
        if let Some(name) = entries.iter().find(|name| name.ends_with(suffix)) {
            return Ok((*format, name.clone()));
        }
    }

    Err(PipelineError::DetectionFailure(format!(
        "unknown documentation format in {}",
        doc_dir.display()
    )))
}

/// Immediate entry names of a directory, sorted for deterministic scans.
pub(crate) fn list_entry_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
