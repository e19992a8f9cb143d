//! GRIN command construction.
//!
//! The tool is spawned from an explicit argument vector, never through a
//! shell. The shell-quoted rendering from [`GrinCommand`]'s `Display` is for
//! logs and the HTML summary only.

use std::fmt;
use std::path::{Path, PathBuf};

use grin_config::{RunConfig, ToolConfig, sanitize_label};

use crate::error::AdapterError;

/// Local paths of the tool's two inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
  pub geneset: PathBuf,
  pub multiplex: PathBuf,
}

/// A fully built invocation of the external tool.
#[derive(Debug, Clone, PartialEq)]
pub struct GrinCommand {
  pub program: String,
  pub args: Vec<String>,
}

#[cfg(test)]
impl GrinCommand {
  /// Whether `flag` appears as a standalone argument.
  pub fn has_flag(&self, flag: &str) -> bool {
    self.args.iter().any(|a| a == flag)
  }

  /// The argument following `flag`, if any.
  pub fn flag_value(&self, flag: &str) -> Option<&str> {
    self
      .args
      .iter()
      .position(|a| a == flag)
      .and_then(|i| self.args.get(i + 1))
      .map(String::as_str)
  }
}

impl fmt::Display for GrinCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let words = std::iter::once(&self.program).chain(&self.args);
    for (i, word) in words.enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      match shlex::try_quote(word) {
        Ok(quoted) => f.write_str(&quoted)?,
        Err(_) => write!(f, "{:?}", word)?,
      }
    }
    Ok(())
  }
}

/// Render a number so it always carries a decimal point (`0.7`, `1.0`).
pub fn format_decimal(value: f64) -> String {
  if value.is_finite() && value.fract() == 0.0 {
    format!("{:.1}", value)
  } else {
    value.to_string()
  }
}

/// Create a fresh output directory `{scratch}/{sanitized label}_{uuid}`.
pub async fn prepare_output_dir(scratch: &Path, label: &str) -> Result<PathBuf, AdapterError> {
  let dir = scratch.join(format!(
    "{}_{}",
    sanitize_label(label),
    uuid::Uuid::new_v4().simple()
  ));
  tokio::fs::create_dir_all(&dir).await?;
  Ok(dir)
}

/// Build the GRIN invocation for one run.
///
/// ```text
/// <launcher...> <script> -d <multiplex> -g <geneset> -r <restart> -t <tau>
///   -m <run_label> -o <output_dir> [-p] [-s] [-v]
/// ```
pub fn build_command(
  tool: &ToolConfig,
  config: &RunConfig,
  inputs: &ResolvedInputs,
  output_dir: &Path,
) -> Result<GrinCommand, AdapterError> {
  let (program, launcher_args) =
    tool
      .launcher
      .split_first()
      .ok_or_else(|| AdapterError::InvalidParameter {
        name: "tool.launcher".to_string(),
        message: "must name a program".to_string(),
      })?;

  let mut args: Vec<String> = launcher_args.to_vec();
  args.push(path_arg("tool.script", &tool.script)?);
  args.extend([
    "-d".to_string(),
    path_arg("multiplex_rdata_path", &inputs.multiplex)?,
    "-g".to_string(),
    path_arg("geneset", &inputs.geneset)?,
    "-r".to_string(),
    format_decimal(config.restart),
    "-t".to_string(),
    config.tau_csv.clone(),
    "-m".to_string(),
    config.run_label.clone(),
    "-o".to_string(),
    path_arg("output directory", output_dir)?,
  ]);

  if config.plot {
    args.push("-p".to_string());
  }
  if config.simple_filenames {
    args.push("-s".to_string());
  }
  if config.verbosity > 0 {
    args.push("-v".to_string());
  }

  Ok(GrinCommand {
    program: program.clone(),
    args,
  })
}

fn path_arg(name: &str, path: &Path) -> Result<String, AdapterError> {
  path.to_str().map(str::to_string).ok_or_else(|| {
    AdapterError::invalid_input(format!(
      "{} path is not valid UTF-8: {}",
      name,
      path.display()
    ))
  })
}
