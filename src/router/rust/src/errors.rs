/* src/router/rust/src/errors.rs */

use std::fmt;

/// Failure reported by a platform capability: a module that would not load,
/// a fetch that failed or returned malformed JSON, or a throwing `clientFetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
  message: String,
}

impl PlatformError {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl fmt::Display for PlatformError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for PlatformError {}

impl From<serde_json::Error> for PlatformError {
  fn from(err: serde_json::Error) -> Self {
    Self::new(format!("invalid JSON: {err}"))
  }
}
