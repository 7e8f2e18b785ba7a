//! Directory resolution: coordinate → local filesystem layout.
//!
//! Pure, no I/O. `root` is the mirror checkout, `base` is where build
//! commands run, `doc` is the documentation directory relative to `base`
//! (with a trailing slash, the way sphinx-build receives it). For a
//! coordinate pointing several levels into a monorepo, `base` is the parent
//! of the documentation directory so build tooling finds its project files.

use std::path::{Path, PathBuf};

use crate::coordinate::RepoCoordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub root: PathBuf,
    pub base: PathBuf,
    pub doc: String,
}

impl DirectoryLayout {
    /// Absolute-ish path of the documentation directory itself.
    pub fn doc_path(&self) -> PathBuf {
        self.base.join(&self.doc)
    }
}

pub fn resolve(mirror_base: &Path, coordinate: &RepoCoordinate) -> DirectoryLayout {
    let root = mirror_base.join(&coordinate.repo);

    if coordinate.directory.is_empty() {
        return DirectoryLayout {
            base: root.clone(),
            root,
            doc: "docs/".to_string(),
        };
    }

    let segments: Vec<&str> = coordinate.directory.split('/').collect();
    match segments.split_last() {
        Some((last, parents)) => {
            let base = if parents.is_empty() {
                root.clone()
            } else {
                root.join(parents.join("/"))
            };
            DirectoryLayout {
                root,
                base,
                doc: format!("{last}/"),
            }
        }
        // split('/') always yields at least one segment; kept total anyway.
        None => DirectoryLayout {
            base: root.clone(),
            root,
            doc: "docs/".to_string(),
        },
    }
}
