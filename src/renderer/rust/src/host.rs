/* src/renderer/rust/src/host.rs */

// Contract with the component runtime that executes page modules server-side.

use std::future::Future;
use std::pin::Pin;

use pagewright_router::Props;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::HostError;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Exports a loaded module declares. Checked by presence only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
  #[serde(default)]
  pub has_default: bool,
  #[serde(default)]
  pub has_prefetch: bool,
  #[serde(default)]
  pub has_client_fetch: bool,
  #[serde(default)]
  pub eager: bool,
}

/// Argument of a page's `prefetch` hook.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrefetchArgs {
  #[serde(rename = "static")]
  pub is_static: bool,
  pub params: Props,
}

impl PrefetchArgs {
  /// Build-time and dev-request prefetches: static, no params.
  pub fn server() -> Self {
    Self { is_static: true, params: Props::new() }
  }
}

/// One call of the Route component's `render`.
///
/// Components are named by module specifier; `layers` lists which of them
/// wrap the page, outermost first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRenderRequest {
  pub route_module: String,
  pub page_module: String,
  pub layout_module: Option<String>,
  pub app_layout_module: Option<String>,
  pub layers: Vec<&'static str>,
  pub page_id: String,
  pub fetching: bool,
  pub page_props: Props,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CssOutput {
  #[serde(default)]
  pub code: Option<String>,
}

/// `{ head, css: { code }, html }` from the Route render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderOutput {
  #[serde(default)]
  pub head: String,
  #[serde(default)]
  pub css: CssOutput,
  #[serde(default)]
  pub html: String,
}

/// Server-side module execution.
pub trait ComponentHost: Send + Sync + 'static {
  /// Import a module and report its exports.
  fn load_module(&self, specifier: &str) -> BoxFuture<Result<ModuleInfo, HostError>>;

  /// Call the module's `prefetch` export. `None` when it resolved to nothing.
  fn prefetch(&self, specifier: &str, args: PrefetchArgs) -> BoxFuture<Result<Option<Value>, HostError>>;

  fn render_route(&self, request: RouteRenderRequest) -> BoxFuture<Result<RenderOutput, HostError>>;
}
