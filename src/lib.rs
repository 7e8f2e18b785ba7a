//! repo2pdf: render the documentation of public GitHub repositories to PDF.
//!
//! The crate is a pipeline wrapped in a small HTTP server. A request carrying
//! a repository URL is parsed into a coordinate, checked against an
//! acceptance policy via the GitHub API, mirrored locally with git, classified
//! by documentation format and language ecosystem, provisioned with `uv`,
//! built with `sphinx-build` and converted to PDF with `pdflatex`. Progress
//! messages are broadcast per run so a second request can stream them while
//! the pipeline executes.

pub mod cli;
pub mod command;
pub mod config;
pub mod coordinate;
pub mod detect;
pub mod environment;
pub mod error;
pub mod github;
pub mod layout;
pub mod mirror;
pub mod pipeline;
pub mod policy;
pub mod progress;
pub mod server;
pub mod sphinx;
