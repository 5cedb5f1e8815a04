/* src/cli/core/src/config/types.rs */

use anyhow::{Result, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagewrightConfig {
  #[serde(default)]
  pub project: ProjectSection,
  #[serde(default)]
  pub dev: DevSection,
  #[serde(default)]
  pub dirs: DirsSection,
  #[serde(default)]
  pub pages: PagesSection,
  #[serde(default)]
  pub runtime: RuntimeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSection {
  /// Defaults to the project directory name.
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevSection {
  #[serde(default = "default_port")]
  pub port: u16,
  /// Port of the module server that transforms and serves source modules.
  #[serde(default = "default_module_server_port")]
  pub module_server_port: u16,
  /// Command that starts the module server, run as a child of `dev`.
  pub module_command: Option<String>,
}

impl Default for DevSection {
  fn default() -> Self {
    Self { port: default_port(), module_server_port: default_module_server_port(), module_command: None }
  }
}

fn default_port() -> u16 {
  3000
}

fn default_module_server_port() -> u16 {
  5173
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirsSection {
  #[serde(default = "default_routes")]
  pub routes: String,
  #[serde(default = "default_export")]
  pub export: String,
  #[serde(default = "default_static")]
  pub r#static: String,
  #[serde(default = "default_global")]
  pub global: String,
  #[serde(default = "default_template")]
  pub template: String,
  #[serde(default = "default_index_module")]
  pub index_module: String,
}

impl Default for DirsSection {
  fn default() -> Self {
    Self {
      routes: default_routes(),
      export: default_export(),
      r#static: default_static(),
      global: default_global(),
      template: default_template(),
      index_module: default_index_module(),
    }
  }
}

fn default_routes() -> String {
  "routes".to_string()
}

fn default_export() -> String {
  "export".to_string()
}

fn default_static() -> String {
  "static".to_string()
}

fn default_global() -> String {
  "global".to_string()
}

fn default_template() -> String {
  "index.html".to_string()
}

fn default_index_module() -> String {
  "index.js".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesSection {
  #[serde(default = "default_extensions")]
  pub extensions: Vec<String>,
  /// Hand the hydrated root to the client router.
  #[serde(default = "default_spa")]
  pub spa: bool,
}

impl Default for PagesSection {
  fn default() -> Self {
    Self { extensions: default_extensions(), spa: default_spa() }
  }
}

fn default_extensions() -> Vec<String> {
  vec!["svelte".to_string(), "svx".to_string()]
}

fn default_spa() -> bool {
  true
}

/// Module specifiers for the JS side of the runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
  #[serde(default = "default_route_module")]
  pub route_module: String,
  #[serde(default = "default_route_module_dev")]
  pub route_module_dev: String,
  #[serde(default = "default_router_module")]
  pub router_module: String,
  #[serde(default = "default_router_module_dev")]
  pub router_module_dev: String,
  #[serde(default = "default_host_script")]
  pub host_script: String,
  #[serde(default = "default_bundler_script")]
  pub bundler_script: String,
}

impl Default for RuntimeSection {
  fn default() -> Self {
    Self {
      route_module: default_route_module(),
      route_module_dev: default_route_module_dev(),
      router_module: default_router_module(),
      router_module_dev: default_router_module_dev(),
      host_script: default_host_script(),
      bundler_script: default_bundler_script(),
    }
  }
}

fn default_route_module() -> String {
  "pagewright/runtime/Route.svelte".to_string()
}

fn default_route_module_dev() -> String {
  "/node_modules/pagewright/runtime/Route.svelte".to_string()
}

fn default_router_module() -> String {
  "pagewright/runtime/router.js".to_string()
}

fn default_router_module_dev() -> String {
  "/node_modules/pagewright/runtime/router.js".to_string()
}

fn default_host_script() -> String {
  "node_modules/pagewright/scripts/host.mjs".to_string()
}

fn default_bundler_script() -> String {
  "node_modules/pagewright/scripts/bundle.mjs".to_string()
}

impl PagewrightConfig {
  pub fn validate(&self) -> Result<()> {
    if self.pages.extensions.is_empty() {
      bail!("pages.extensions must not be empty");
    }
    if let Some(ext) = self.pages.extensions.iter().find(|e| e.is_empty() || e.starts_with('.')) {
      bail!("pages.extensions entry \"{ext}\" must be a bare extension such as \"svelte\"");
    }
    if self.pages.extensions.iter().any(|e| e.eq_ignore_ascii_case("html")) {
      bail!("pages.extensions must not contain \"html\" (plain .html files are served as-is)");
    }
    if self.dev.port == 0 || self.dev.module_server_port == 0 {
      bail!("dev.port and dev.module_server_port must be non-zero");
    }
    if self.dev.port == self.dev.module_server_port {
      bail!("dev.port and dev.module_server_port must differ (both are {})", self.dev.port);
    }
    Ok(())
  }
}
