/* src/renderer/rust/src/render.rs */

use std::io;
use std::path::Path;
use std::sync::Arc;

use pagewright_router::{Layer, Props, RouteProps};
use serde_json::Value;

use crate::assets::GlobalAssets;
use crate::document::{DEFAULT_TEMPLATE, Fragments, assemble};
use crate::errors::{HostError, RenderError, RenderStage};
use crate::host::{ComponentHost, ModuleInfo, PrefetchArgs, RouteRenderRequest};
use crate::minify::minify_html;
use crate::script::{ClientScript, hot_script, script_block};

/// Per-page render settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
  pub page_id: String,
  pub script: ClientScript,
  /// Chunk URLs emitted as `<link rel="modulepreload">`.
  pub preloads: Vec<String>,
  pub route_module: String,
  pub layout_module: Option<String>,
  pub app_layout_module: Option<String>,
  /// Skip minification.
  pub dev: bool,
  /// Tag styles for removal and append the hot script.
  pub hot: bool,
}

/// Base document plus the global assets spliced into every page.
#[derive(Debug, Clone)]
pub struct PageShell {
  pub template: String,
  pub globals: GlobalAssets,
}

impl PageShell {
  /// Read `template` when it exists, else fall back to the built-in document.
  pub fn load(template: &Path, global_dir: &Path, global_url: &str) -> io::Result<Self> {
    let template = if template.is_file() { std::fs::read_to_string(template)? } else { DEFAULT_TEMPLATE.to_string() };
    Ok(Self { template, globals: GlobalAssets::load(global_dir, global_url)? })
  }
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
  pub html: String,
  /// Resolved value of the page's `prefetch`, when it has one.
  pub prefetched_props: Option<Props>,
}

pub struct Renderer<H> {
  host: Arc<H>,
}

impl<H> Clone for Renderer<H> {
  fn clone(&self) -> Self {
    Self { host: self.host.clone() }
  }
}

impl<H: ComponentHost> Renderer<H> {
  pub fn new(host: Arc<H>) -> Self {
    Self { host }
  }

  pub fn host(&self) -> &Arc<H> {
    &self.host
  }

  async fn load(&self, page: &str, module: &str) -> Result<ModuleInfo, RenderError> {
    self.host.load_module(module).await.map_err(|e| RenderError::new(page, RenderStage::Load, e))
  }

  async fn run_prefetch(&self, page: &str, info: &ModuleInfo) -> Result<Option<Props>, RenderError> {
    if !info.has_prefetch {
      return Ok(None);
    }
    let fail = |e| RenderError::new(page, RenderStage::Prefetch, e);
    match self.host.prefetch(page, PrefetchArgs::server()).await.map_err(fail)? {
      None | Some(Value::Null) => Ok(None),
      Some(Value::Object(props)) => Ok(Some(props)),
      Some(other) => Err(fail(HostError::new(format!("prefetch resolved to {other}, expected an object")))),
    }
  }

  /// Run the page's server `prefetch` on its own, as the dev prefetch endpoint does.
  pub async fn prefetch_page(&self, page_module: &str) -> Result<Option<Props>, RenderError> {
    let info = self.load(page_module, page_module).await?;
    self.run_prefetch(page_module, &info).await
  }

  /// Server-render one page into a complete document.
  ///
  /// A failure in any step aborts this page only; nothing partial is returned.
  pub async fn render_page(
    &self,
    page_module: &str,
    options: &RenderOptions,
    shell: &PageShell,
  ) -> Result<RenderedPage, RenderError> {
    let info = self.load(page_module, page_module).await?;
    if !info.has_default {
      return Err(RenderError::new(page_module, RenderStage::Load, HostError::new("page module has no default export")));
    }
    let prefetched_props = self.run_prefetch(page_module, &info).await?;

    for layout in [&options.layout_module, &options.app_layout_module].into_iter().flatten() {
      self.load(page_module, layout).await?;
    }

    let components = RouteProps {
      page_component: Some(page_module),
      layout_component: options.layout_module.as_deref(),
      app_layout_component: options.app_layout_module.as_deref(),
    };
    let page_props = prefetched_props.clone().unwrap_or_default();
    let request = RouteRenderRequest {
      route_module: options.route_module.clone(),
      page_module: page_module.to_string(),
      layout_module: options.layout_module.clone(),
      app_layout_module: options.app_layout_module.clone(),
      layers: components.layers().into_iter().map(Layer::as_str).collect(),
      page_id: options.page_id.clone(),
      fetching: true,
      page_props: page_props.clone(),
    };
    let rendered = self
      .host
      .render_route(request)
      .await
      .map_err(|e| RenderError::new(page_module, RenderStage::Render, e))?;

    let encode = |e: serde_json::Error| RenderError::new(page_module, RenderStage::Render, HostError::new(e.to_string()));
    let script = script_block(&options.script, &options.preloads, &page_props, &shell.globals.js).map_err(encode)?;
    let hot = if options.hot { hot_script(&shell.globals.css).map_err(encode)? } else { String::new() };

    let tag = if options.hot { "<style data-style-dev type=\"text/css\">" } else { "<style type=\"text/css\">" };
    let css = shell
      .globals
      .css_codes()
      .chain(rendered.css.code.as_deref())
      .filter(|code| !code.is_empty())
      .map(|code| format!("{tag}{code}</style>"))
      .collect::<Vec<_>>()
      .join("\n");

    let html = assemble(
      &shell.template,
      &Fragments { head: &rendered.head, css: &css, script: &script, hot: &hot, html: &rendered.html },
    );
    let html = if options.dev { html } else { minify_html(&html) };
    Ok(RenderedPage { html, prefetched_props })
  }
}
