//! Minimal HTML run summary.

use std::path::{Path, PathBuf};

use minijinja::{Environment, context};

use crate::error::AdapterError;

const INDEX: &str = "index.html";
const FALLBACK: &str = "grin_log.html";

/// Registered under an `.html` name so minijinja escapes every value.
const SUMMARY_TEMPLATE: &str = "summary.html";
const SUMMARY: &str = "<h2>GRIN finished</h2>
<h3>Command</h3>
<pre>{{ command }}</pre>
<h3>Log</h3>
<pre>{{ log }}</pre>
";

/// Write a summary page with the command line and tool log into `html_dir`.
///
/// The page is `index.html` unless the tool already wrote one, in which case
/// it becomes `grin_log.html` next to it.
pub async fn write_summary(
  html_dir: &Path,
  command_line: &str,
  log: &str,
) -> Result<PathBuf, AdapterError> {
  let page = render_summary(command_line, log)?;

  tokio::fs::create_dir_all(html_dir).await?;

  let index = html_dir.join(INDEX);
  let path = if tokio::fs::try_exists(&index).await? {
    html_dir.join(FALLBACK)
  } else {
    index
  };

  tokio::fs::write(&path, page).await?;

  Ok(path)
}

fn render_summary(command_line: &str, log: &str) -> Result<String, AdapterError> {
  let mut env = Environment::new();
  env.add_template(SUMMARY_TEMPLATE, SUMMARY)?;

  let page = env
    .get_template(SUMMARY_TEMPLATE)?
    .render(context! { command => command_line, log => log })?;
  Ok(page)
}
