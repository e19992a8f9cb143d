use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grin_config::{AdapterConfig, RunParams};
use grin_host::HostServices;
use grin_runtime::GrinAdapter;

/// GRIN - gene network refinement on a multiplex network
#[derive(Parser)]
#[command(name = "grin")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.grin)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to an adapter config file (JSON)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run GRIN once
  Run {
    /// Path to the run parameters (JSON). Read from stdin when omitted.
    params_file: Option<PathBuf>,
  },

  /// Print the adapter status
  Status,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".grin"),
  };

  let config = load_config(cli.config.as_deref(), &data_dir)?;

  match cli.command {
    Some(Commands::Run { params_file }) => {
      run(params_file, config, data_dir)?;
    }
    Some(Commands::Status) => {
      let host = HostServices::local(&data_dir, &config.scratch);
      let adapter = GrinAdapter::new(config, host);
      println!("{}", serde_json::to_string_pretty(&adapter.status())?);
    }
    None => {
      println!("grin - use --help to see available commands");
    }
  }

  Ok(())
}

fn load_config(path: Option<&Path>, data_dir: &Path) -> Result<AdapterConfig> {
  match path {
    Some(path) => AdapterConfig::from_file(path)
      .with_context(|| format!("failed to load config file: {}", path.display())),
    None => Ok(AdapterConfig::with_scratch(data_dir.join("scratch"))),
  }
}

fn run(params_file: Option<PathBuf>, config: AdapterConfig, data_dir: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_async(params_file, config, data_dir).await })
}

async fn run_async(
  params_file: Option<PathBuf>,
  config: AdapterConfig,
  data_dir: PathBuf,
) -> Result<()> {
  let payload = match params_file {
    Some(path) => {
      let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read params file: {}", path.display()))?;
      serde_json::from_str(&content)
        .with_context(|| format!("failed to parse params file: {}", path.display()))?
    }
    None => read_payload_from_stdin()?,
  };

  let params: RunParams =
    serde_json::from_value(payload).context("run parameters have an unexpected shape")?;

  let host = HostServices::local(&data_dir, &config.scratch);
  let adapter = GrinAdapter::new(config, host);

  let result = adapter.run_grin(&params).await.context("GRIN run failed")?;

  println!("{}", serde_json::to_string_pretty(&result)?);

  Ok(())
}

fn read_payload_from_stdin() -> Result<serde_json::Value> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    Ok(serde_json::json!({}))
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read params from stdin")?;

    if input.trim().is_empty() {
      Ok(serde_json::json!({}))
    } else {
      serde_json::from_str(&input).context("failed to parse params JSON from stdin")
    }
  }
}
