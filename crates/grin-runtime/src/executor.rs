//! External process execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, info, instrument};

use crate::command::GrinCommand;
use crate::error::AdapterError;

/// Runs a [`GrinCommand`] to completion.
///
/// Standard output and standard error share one log file handle, so the
/// captured text interleaves in the order the tool wrote it.
pub struct Executor {
  timeout: Option<Duration>,
}

impl Executor {
  /// Create an executor. `None` waits for the tool indefinitely.
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  /// Run the command, capturing merged output into `log_path`.
  ///
  /// Returns the captured output on success.
  #[instrument(
    name = "grin_execute",
    skip(self, command),
    fields(program = %command.program, log = %log_path.display())
  )]
  pub async fn run(&self, command: &GrinCommand, log_path: &Path) -> Result<String, AdapterError> {
    info!(command = %command, "command started");

    let result = self.run_inner(command, log_path).await;

    match &result {
      Ok(output) => info!(bytes = output.len(), "command completed"),
      Err(e) => error!(error = %e, "command failed"),
    }

    result
  }

  async fn run_inner(&self, command: &GrinCommand, log_path: &Path) -> Result<String, AdapterError> {
    let log = std::fs::File::create(log_path)?;

    let mut child = Command::new(&command.program)
      .args(&command.args)
      .stdin(Stdio::null())
      .stdout(Stdio::from(log.try_clone()?))
      .stderr(Stdio::from(log))
      .kill_on_drop(true)
      .spawn()
      .map_err(|source| AdapterError::Spawn {
        program: command.program.clone(),
        source,
      })?;

    let status = match self.timeout {
      None => child.wait().await?,
      Some(limit) => {
        let waited = tokio::time::timeout(limit, child.wait()).await;
        match waited {
          Ok(status) => status?,
          Err(_) => {
            child.kill().await?;
            return Err(AdapterError::Timeout {
              limit,
              output: read_log(log_path).await?,
            });
          }
        }
      }
    };

    let output = read_log(log_path).await?;
    debug!(output = %output, "captured output");

    if !status.success() {
      return Err(AdapterError::ExecutionFailed {
        code: status.code(),
        output,
      });
    }

    Ok(output)
  }
}

async fn read_log(path: &Path) -> Result<String, AdapterError> {
  let bytes = tokio::fs::read(path).await?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}
