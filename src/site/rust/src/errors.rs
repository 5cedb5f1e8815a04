/* src/site/rust/src/errors.rs */

use std::fmt;
use std::path::{Path, PathBuf};

/// Filesystem failure while scanning the routes tree.
#[derive(Debug)]
pub struct SiteError {
  path: PathBuf,
  source: std::io::Error,
}

impl SiteError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self { path: path.into(), source }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl fmt::Display for SiteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.path.display(), self.source)
  }
}

impl std::error::Error for SiteError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}

impl From<walkdir::Error> for SiteError {
  fn from(err: walkdir::Error) -> Self {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let source = err.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    Self { path, source }
  }
}
