//! End-to-end tests for GrinAdapter::run_grin using a stand-in GRIN script.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use grin_config::{AdapterConfig, RunParams, ToolConfig};
use grin_host::{HostError, HostServices, ReportInfo, ReportService, ReportSpec};
use grin_runtime::{AdapterError, GrinAdapter};
use serde_json::json;

/// Shell script standing in for `Rscript GRIN.R`.
///
/// Appends its argument list to `calls.log`, then writes `retained_genes.txt`
/// into the directory given with `-o`.
const STAND_IN: &str = r#"#!/bin/sh
echo "$*" >> "__CALLS__"
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
echo "stand-in GRIN writing to $out"
printf 'G1\nG2\n' > "$out/retained_genes.txt"
"#;

const FAILING: &str = r#"#!/bin/sh
echo "GRIN error: multiplex file is corrupt"
exit 3
"#;

struct TestEnv {
  dir: tempfile::TempDir,
  adapter: GrinAdapter,
}

impl TestEnv {
  fn root(&self) -> &Path {
    self.dir.path()
  }

  fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.root().join("calls.log"))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  fn local_file(&self, name: &str, content: &[u8]) -> String {
    let path = self.root().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
  }
}

fn create_env(script_body: &str) -> TestEnv {
  create_env_with(script_body, |_| {})
}

fn create_env_with(script_body: &str, customize: impl FnOnce(&mut HostServices)) -> TestEnv {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let calls = dir.path().join("calls.log");
  let script = dir.path().join("grin_stand_in.sh");
  std::fs::write(
    &script,
    script_body.replace("__CALLS__", &calls.display().to_string()),
  )
  .unwrap();

  let scratch = dir.path().join("scratch");
  let config = AdapterConfig {
    tool: ToolConfig {
      launcher: vec!["sh".to_string()],
      script: PathBuf::from(&script),
    },
    ..AdapterConfig::with_scratch(&scratch)
  };
  let mut host = HostServices::local(&dir.path().join("host"), &scratch);
  customize(&mut host);

  TestEnv {
    adapter: GrinAdapter::new(config, host),
    dir,
  }
}

fn params(value: serde_json::Value) -> RunParams {
  serde_json::from_value(value).expect("invalid params")
}

fn read_report(env: &TestEnv, report_ref: &str) -> serde_json::Value {
  let path = env
    .root()
    .join("host/reports")
    .join(format!("{}.json", report_ref));
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_run_with_defaults() {
  let env = create_env(STAND_IN);
  let geneset = env.local_file("genes.tsv", b"set\tG1\nset\tG2\n");
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let result = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": geneset,
      "multiplex_rdata_path": multiplex,
    })))
    .await
    .expect("run_grin failed");

  assert_eq!(result.len(), 1);
  assert!(!result[0].report_name.is_empty());
  assert!(!result[0].report_ref.is_empty());

  let calls = env.calls();
  assert_eq!(calls.len(), 1, "tool should be invoked exactly once");
  assert!(calls[0].contains("-r 0.7 "));
  assert!(calls[0].contains("-t 1,1,1,1,1,1,1,1,1,1 "));
  assert!(calls[0].contains("-m run1 "));
  assert!(calls[0].contains(&format!("-g {} ", geneset)));
  assert!(calls[0].ends_with(" -s"));

  let report = read_report(&env, &result[0].report_ref);
  assert_eq!(report["message"], "GRIN completed: GRIN");
  assert_eq!(report["direct_html_link_index"], 0);
  assert_eq!(report["html_links"][0]["name"], "index.html");
  assert_eq!(report["file_links"].as_array().unwrap().len(), 1);
  assert_eq!(report["file_links"][0]["name"], "retained_genes.txt");
}

#[tokio::test]
async fn test_output_dir_named_from_label() {
  let env = create_env(STAND_IN);
  let geneset = env.local_file("genes.tsv", b"set\tG1\n");
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let result = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": geneset,
      "multiplex_rdata_path": multiplex,
      "output_name": "drought run #2",
      "plot": "yes",
      "verbosity": "1",
    })))
    .await
    .unwrap();

  let out_dirs: Vec<String> = std::fs::read_dir(env.root().join("scratch"))
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .filter(|n| n.starts_with("drought_run__2_"))
    .collect();
  assert_eq!(out_dirs.len(), 1);

  let out_dir = env.root().join("scratch").join(&out_dirs[0]);
  assert!(out_dir.join("html/index.html").exists());
  let log = std::fs::read_to_string(out_dir.join("grin.log")).unwrap();
  assert!(log.starts_with("stand-in GRIN writing to"));

  let calls = env.calls();
  assert!(calls[0].ends_with(" -p -s -v"));

  let report = read_report(&env, &result[0].report_ref);
  assert_eq!(report["message"], "GRIN completed: drought_run__2");
}

#[tokio::test]
async fn test_run_from_feature_set_ref() {
  let env = create_env(STAND_IN);
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let object_path = env.root().join("host/objects/12/3/1.json");
  std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
  std::fs::write(
    &object_path,
    json!({
      "info": { "name": "drought_genes", "type": "FeatureSet" },
      "data": {
        "description": "drought responsive",
        "up": { "feature_ids": ["AT1G02", "AT1G01"] },
        "down": { "features": [{ "id": "AT1G03" }, "AT1G01"] }
      }
    })
    .to_string(),
  )
  .unwrap();

  env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "feature_set_ref": "12/3/1",
      "multiplex_rdata_path": multiplex,
    })))
    .await
    .unwrap();

  let calls = env.calls();
  let args: Vec<&str> = calls[0].split(' ').collect();
  let geneset_idx = args.iter().position(|a| *a == "-g").unwrap() + 1;
  let tsv = std::fs::read_to_string(args[geneset_idx]).unwrap();

  assert_eq!(
    tsv,
    "drought_genes\tAT1G01\ndrought_genes\tAT1G02\ndrought_genes\tAT1G03\n"
  );
}

#[tokio::test]
async fn test_staged_inputs_are_downloaded() {
  let env = create_env(STAND_IN);
  let staging = env.root().join("host/staging/user");
  std::fs::create_dir_all(&staging).unwrap();
  std::fs::write(staging.join("genes.tsv"), "set\tG1\n").unwrap();
  std::fs::write(staging.join("multiplex.Rdata"), "RDX3").unwrap();

  let result = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": "user/genes.tsv",
      "multiplex_rdata_path": "user/multiplex.Rdata",
    })))
    .await
    .unwrap();

  assert_eq!(result.len(), 1);
  assert!(env.calls()[0].contains(&env.root().join("scratch").display().to_string()));
}

#[tokio::test]
async fn test_tool_failure_surfaces_output() {
  let env = create_env(FAILING);
  let geneset = env.local_file("genes.tsv", b"set\tG1\n");
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let err = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": geneset,
      "multiplex_rdata_path": multiplex,
    })))
    .await
    .unwrap_err();

  let message = err.to_string();
  assert!(message.contains("exit code 3"), "{message}");
  assert!(message.contains("GRIN error: multiplex file is corrupt\n"), "{message}");

  match err {
    AdapterError::ExecutionFailed { code, output } => {
      assert_eq!(code, Some(3));
      assert_eq!(output, "GRIN error: multiplex file is corrupt\n");
    }
    other => panic!("expected execution failure, got {other}"),
  }

  assert!(!env.root().join("host/reports").exists());
}

#[tokio::test]
async fn test_missing_workspace() {
  let env = create_env(STAND_IN);

  let err = env
    .adapter
    .run_grin(&params(json!({
      "geneset_tsv_path": "genes.tsv",
      "multiplex_rdata_path": "multiplex.Rdata",
    })))
    .await
    .unwrap_err();

  assert!(matches!(err, AdapterError::MissingParameter { ref name } if name == "workspace_name"));
  assert!(env.calls().is_empty());
}

#[tokio::test]
async fn test_unresolvable_multiplex() {
  let env = create_env(STAND_IN);
  let geneset = env.local_file("genes.tsv", b"set\tG1\n");

  let err = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": geneset,
      "multiplex_rdata_path": "nowhere/multiplex.Rdata",
    })))
    .await
    .unwrap_err();

  assert!(matches!(err, AdapterError::InvalidInput { .. }));
  assert!(env.calls().is_empty());
}

#[tokio::test]
async fn test_empty_feature_set() {
  let env = create_env(STAND_IN);
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let object_path = env.root().join("host/objects/ws/empty.json");
  std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
  std::fs::write(
    &object_path,
    json!({ "info": { "name": "empty" }, "data": { "elements": {} } }).to_string(),
  )
  .unwrap();

  let err = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "feature_set_ref": "ws/empty",
      "multiplex_rdata_path": multiplex,
    })))
    .await
    .unwrap_err();

  assert!(matches!(err, AdapterError::EmptySet { .. }));
  assert!(env.calls().is_empty());
}

struct RejectingReports;

#[async_trait]
impl ReportService for RejectingReports {
  async fn create_report(&self, _report: &ReportSpec) -> Result<ReportInfo, HostError> {
    Err(HostError::service("report service unavailable"))
  }
}

#[tokio::test]
async fn test_report_failure_keeps_output() {
  let env = create_env_with(STAND_IN, |host| host.reports = Arc::new(RejectingReports));
  let geneset = env.local_file("genes.tsv", b"set\tG1\n");
  let multiplex = env.local_file("multiplex.Rdata", b"RDX3");

  let err = env
    .adapter
    .run_grin(&params(json!({
      "workspace_name": "ws1",
      "geneset_tsv_path": geneset,
      "multiplex_rdata_path": multiplex,
    })))
    .await
    .unwrap_err();

  assert!(matches!(err, AdapterError::Host(HostError::Service { .. })));
  assert_eq!(env.calls().len(), 1);

  let out_dirs: Vec<PathBuf> = std::fs::read_dir(env.root().join("scratch"))
    .unwrap()
    .map(|e| e.unwrap().path())
    .filter(|p| p.is_dir() && p.file_name().unwrap().to_string_lossy().starts_with("GRIN_"))
    .collect();
  assert_eq!(out_dirs.len(), 1);
  assert!(out_dirs[0].join("grin.log").is_file());
  assert!(out_dirs[0].join("html/index.html").is_file());
  assert!(out_dirs[0].join("retained_genes.txt").is_file());
}

#[test]
fn test_status() {
  let env = create_env(STAND_IN);
  let status = env.adapter.status();

  assert_eq!(status.state, "OK");
  assert!(!status.version.is_empty());
}
