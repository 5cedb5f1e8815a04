/* src/cli/core/src/shell.rs */

// Locating and invoking the JS side of the toolchain.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Result, bail};

/// JS runtime used for the host and bundler scripts: bun when installed, else node.
pub(crate) fn js_runtime() -> &'static str {
  if which_exists("bun") { "bun" } else { "node" }
}

/// Resolve a configured script path against the project root.
pub(crate) fn find_script(base_dir: &Path, configured: &str, key: &str) -> Result<PathBuf> {
  let path = base_dir.join(configured);
  if path.is_file() {
    return Ok(path);
  }
  bail!("{} not found -- install the pagewright npm package or set runtime.{key}", path.display());
}

/// Check if a command exists on PATH.
pub(crate) fn which_exists(cmd: &str) -> bool {
  Command::new("which")
    .arg(cmd)
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}
