/* src/renderer/rust/src/errors.rs */

use std::fmt;

/// Error reported by the component host, with the JS stack when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
  message: String,
  stack: Option<String>,
}

impl HostError {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into(), stack: None }
  }

  pub fn with_stack(message: impl Into<String>, stack: Option<String>) -> Self {
    Self { message: message.into(), stack }
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn stack(&self) -> Option<&str> {
    self.stack.as_deref()
  }
}

impl fmt::Display for HostError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for HostError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
  Load,
  Prefetch,
  Render,
}

impl fmt::Display for RenderStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Load => "load",
      Self::Prefetch => "prefetch",
      Self::Render => "render",
    })
  }
}

/// A single page failed to render. Carries the page module and the host error.
#[derive(Debug)]
pub struct RenderError {
  page: String,
  stage: RenderStage,
  source: HostError,
}

impl RenderError {
  pub fn new(page: impl Into<String>, stage: RenderStage, source: HostError) -> Self {
    Self { page: page.into(), stage, source }
  }

  pub fn page(&self) -> &str {
    &self.page
  }

  pub fn stage(&self) -> RenderStage {
    self.stage
  }

  pub fn host_error(&self) -> &HostError {
    &self.source
  }

  /// Stack trace for operator output: the host's stack, else the message.
  pub fn stack(&self) -> &str {
    self.source.stack().unwrap_or(self.source.message())
  }
}

impl fmt::Display for RenderError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "failed to {} page {}: {}", self.stage, self.page, self.source)
  }
}

impl std::error::Error for RenderError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    Some(&self.source)
  }
}
