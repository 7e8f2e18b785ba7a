//! Deadline-bounded subprocess execution.
//!
//! All external tools (git, uv, sphinx-build, pdflatex) are driven through
//! [`CommandRunner`], which applies a single wall-clock deadline per
//! invocation and kills the child when it expires. A hung build tool
//! therefore fails the run with [`CommandError::Timeout`] instead of hanging
//! the request forever.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

#[derive(Debug, Clone, Copy)]
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run a command to completion and require a zero exit status.
    pub async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<Output, CommandError> {
        let output = self.run_unchecked(program, args, cwd).await?;
        if !output.status.success() {
            return Err(CommandError::Failed {
                command: render(program, args),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(output)
    }

    /// Run a command to completion, surfacing only spawn failures and
    /// timeouts. Callers that tolerate a non-zero exit inspect the status
    /// themselves.
    pub async fn run_unchecked(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<Output, CommandError> {
        let command = render(program, args);
        debug!(command = %command, cwd = ?cwd, "Executing");

        let mut invocation = Command::new(program);
        invocation
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            invocation.current_dir(dir);
        }

        let child = invocation.spawn().map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

        // Dropping the timed-out future drops the child handle, which kills
        // the process because of kill_on_drop above.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(CommandError::Spawn { command, source }),
            Err(_) => Err(CommandError::Timeout {
                command,
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
