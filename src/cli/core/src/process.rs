/* src/cli/core/src/process.rs */

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::ui::{CYAN, DIM, MAGENTA, RESET};

pub(crate) struct ChildProcess {
  pub label: &'static str,
  pub child: Child,
}

/// Run a user-configured command through `sh -c`, killed when dropped.
pub(crate) fn spawn_child(
  label: &'static str,
  command: &str,
  base_dir: &Path,
  env_vars: &[(&str, &str)],
) -> Result<ChildProcess> {
  let mut cmd = Command::new("sh");
  cmd.args(["-c", command]);
  cmd.current_dir(base_dir);
  cmd.stdout(Stdio::piped());
  cmd.stderr(Stdio::piped());
  cmd.kill_on_drop(true);

  for (key, val) in env_vars {
    cmd.env(key, val);
  }

  let child = cmd.spawn().with_context(|| format!("failed to start {label}: {command}"))?;
  Ok(ChildProcess { label, child })
}

pub(crate) fn label_color(label: &str) -> &'static str {
  match label {
    "host" => CYAN,
    "modules" => MAGENTA,
    _ => DIM,
  }
}

/// Print every line of `reader` prefixed with a colored label.
pub(crate) fn pipe_lines<R>(label: &'static str, reader: R, to_stderr: bool)
where
  R: AsyncRead + Unpin + Send + 'static,
{
  let color = label_color(label);
  tokio::spawn(async move {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
      if to_stderr {
        eprintln!("  {color}{DIM}{label:>8}{RESET} {line}");
      } else {
        println!("  {color}{DIM}{label:>8}{RESET} {line}");
      }
    }
  });
}

/// Pipe stdout/stderr, prefixed with a colored label
pub(crate) fn pipe_output(proc: &mut ChildProcess) {
  if let Some(stdout) = proc.child.stdout.take() {
    pipe_lines(proc.label, stdout, false);
  }
  if let Some(stderr) = proc.child.stderr.take() {
    pipe_lines(proc.label, stderr, true);
  }
}

/// Wait for any child process to exit, return its label and exit status
pub(crate) async fn wait_any(
  children: &mut [ChildProcess],
) -> (&'static str, Result<std::process::ExitStatus, std::io::Error>) {
  loop {
    for child in children.iter_mut() {
      match child.child.try_wait() {
        Ok(Some(status)) => return (child.label, Ok(status)),
        Ok(None) => {}
        Err(e) => return (child.label, Err(e)),
      }
    }
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
  }
}
