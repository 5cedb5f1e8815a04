/* src/cli/core/src/bundler.rs */

// Runs the external bundler script: plan JSON on stdin, BundleOutput JSON on stdout.

use std::path::Path;
use std::process::{Output, Stdio};

use anyhow::{Context, Result, bail};
use pagewright_site::{BundleOutput, BundlePlan};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::shell::{find_script, js_runtime};
use crate::ui::{self, DIM, RESET};

pub(crate) async fn run_bundler(base_dir: &Path, bundler_script: &str, plan: &BundlePlan) -> Result<BundleOutput> {
  let script = find_script(base_dir, bundler_script, "bundler_script")?;
  let runtime = js_runtime();
  ui::detail(&format!("{DIM}{runtime} {bundler_script} ({} entries){RESET}", plan.entries.len()));

  let payload = serde_json::to_vec(plan).context("failed to encode bundle plan")?;
  let mut command = Command::new(runtime);
  command.arg(&script).current_dir(base_dir);
  let output = run_with_input(command, payload).await?;
  if !output.status.success() {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut msg = format!("bundler exited with status {}", output.status);
    if !stderr.is_empty() {
      msg.push('\n');
      msg.push_str(&stderr);
    }
    if !stdout.is_empty() {
      msg.push('\n');
      msg.push_str(&stdout);
    }
    bail!("{msg}");
  }
  parse_output(&output.stdout)
}

/// Feed `input` to the child's stdin while its stdout and stderr are drained.
async fn run_with_input(mut command: Command, input: Vec<u8>) -> Result<Output> {
  let mut child = command
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .context("failed to run bundler")?;

  let mut stdin = child.stdin.take().context("bundler stdin not captured")?;
  let writer = tokio::spawn(async move {
    let result = stdin.write_all(&input).await;
    drop(stdin);
    result
  });

  let output = child.wait_with_output().await.context("failed to wait for bundler")?;
  let written = writer.await.context("bundle plan writer panicked")?;
  // a bundler that exits early closes stdin; its exit status is the better error
  if output.status.success() {
    written.context("failed to send bundle plan")?;
  }
  Ok(output)
}

/// The bundler may log before its result; the report is the last non-empty line.
fn parse_output(stdout: &[u8]) -> Result<BundleOutput> {
  let text = String::from_utf8_lossy(stdout);
  let last = text.lines().rev().find(|l| !l.trim().is_empty()).context("bundler printed no output")?;
  serde_json::from_str(last).context("failed to parse bundler output")
}
