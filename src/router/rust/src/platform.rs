/* src/router/rust/src/platform.rs */

use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use url::Url;

use crate::errors::PlatformError;
use crate::module::ModuleRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreloadLink {
  /// `<link rel="modulepreload">`
  Module(String),
  /// `<link rel="preload" as="fetch">`
  Fetch(String),
}

impl PreloadLink {
  pub fn href(&self) -> &str {
    match self {
      Self::Module(href) | Self::Fetch(href) => href,
    }
  }
}

/// Browser capabilities the router drives. Everything here is single-threaded.
pub trait Platform: 'static {
  type Component: Clone + 'static;

  /// Dynamic `import()` of a module URL.
  fn load_module(
    &self,
    url: &str,
  ) -> LocalBoxFuture<'static, Result<ModuleRecord<Self::Component>, PlatformError>>;

  /// GET a URL and parse the body as JSON.
  fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, PlatformError>>;

  fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()>;

  /// Run a detached task on the event loop.
  fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

  fn push_state(&self, href: &str, id: u64);

  /// Full document load of `href`, leaving the page to the server.
  fn hard_navigate(&self, href: &str);

  fn location(&self) -> Url;

  /// Targets of the anchors currently in the document.
  fn links(&self) -> Vec<Url>;

  fn insert_preload(&self, link: PreloadLink);

  fn report_error(&self, error: &PlatformError);
}
