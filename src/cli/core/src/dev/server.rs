/* src/cli/core/src/dev/server.rs */

// Dev server: on-demand page rendering, dev manifest and prefetch endpoints,
// static files, and a reverse proxy to the module server for everything else.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use pagewright_renderer::{ClientScript, ComponentHost, RenderError, RenderOptions, Renderer};
use pagewright_router::{DEV_PREFETCH_PREFIX, MANIFEST_URL};
use pagewright_site::{ResolvedPage, dev_manifest, generate_entry, list_pages, resolve_path, resolve_static_html};
use serde_json::json;
use tower_http::services::ServeDir;

use crate::project::Project;
use crate::ui;

pub(super) struct DevState<H> {
  pub project: Arc<Project>,
  pub renderer: Renderer<H>,
  pub module_origin: String,
  pub client: reqwest::Client,
}

impl<H> Clone for DevState<H> {
  fn clone(&self) -> Self {
    Self {
      project: self.project.clone(),
      renderer: self.renderer.clone(),
      module_origin: self.module_origin.clone(),
      client: self.client.clone(),
    }
  }
}

fn text(status: StatusCode, body: String) -> Response {
  (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

fn not_found() -> Response {
  text(StatusCode::NOT_FOUND, "404: Not found".to_string())
}

fn render_failure(path: &str, err: &RenderError) -> Response {
  ui::fail(&format!("{path}: {err}"));
  text(StatusCode::INTERNAL_SERVER_ERROR, format!("500: Oops, something broke!\n\n{}", err.stack()))
}

fn internal_error(path: &str, err: &anyhow::Error) -> Response {
  ui::fail(&format!("{path}: {err:#}"));
  text(StatusCode::INTERNAL_SERVER_ERROR, format!("500: Oops, something broke!\n\n{err:?}"))
}

/// Paths that are never pages.
fn is_hidden_path(path: &str) -> bool {
  let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
  last == "_app" || last == "_layout" || path.starts_with("/view-source")
}

/// Requests the module server answers: package and tool paths, and any file
/// with an extension other than `.html`.
pub(super) fn is_module_request(path: &str) -> bool {
  if path.starts_with("/node_modules/") || path.starts_with("/@") {
    return true;
  }
  let last = path.rsplit('/').next().unwrap_or("");
  match last.rsplit_once('.') {
    Some((stem, ext)) => !stem.is_empty() && ext != "html",
    None => false,
  }
}

async fn manifest_handler<H: ComponentHost>(State(state): State<DevState<H>>) -> Response {
  let project = &state.project;
  match list_pages(&project.routes_dir(), project.extensions()) {
    Ok(pages) => {
      let app_layout = project.app_layout_file();
      Json(dev_manifest(&pages, &project.config.dirs.routes, app_layout.as_deref())).into_response()
    }
    Err(e) => internal_error(MANIFEST_URL, &anyhow::Error::from(e)),
  }
}

async fn prefetch_handler<H: ComponentHost>(state: &DevState<H>, path: &str) -> Response {
  let page_path = path.strip_prefix(DEV_PREFETCH_PREFIX).unwrap_or(path);
  let project = &state.project;
  let Some(page) = resolve_path(&project.routes_dir(), page_path, project.extensions()) else {
    return not_found();
  };
  match state.renderer.prefetch_page(&project.module_url(&page.page_path)).await {
    Ok(props) => Json(props.map_or_else(|| json!({}), serde_json::Value::Object)).into_response(),
    Err(e) => render_failure(path, &e),
  }
}

async fn page_response<H: ComponentHost>(state: &DevState<H>, path: &str) -> Response {
  let routes_dir = state.project.routes_dir();
  match resolve_path(&routes_dir, path, state.project.extensions()) {
    Some(page) => render_response(state, path, &page).await,
    None => match resolve_static_html(&routes_dir, path) {
      Some(file) => static_html_response(path, &file),
      None => not_found(),
    },
  }
}

fn static_html_response(path: &str, file: &Path) -> Response {
  match std::fs::read_to_string(file) {
    Ok(html) => Html(html).into_response(),
    Err(e) => internal_error(path, &anyhow::Error::from(e)),
  }
}

async fn render_response<H: ComponentHost>(state: &DevState<H>, path: &str, page: &ResolvedPage) -> Response {
  let project = &state.project;
  let shell = match project.page_shell() {
    Ok(shell) => shell,
    Err(e) => return internal_error(path, &e),
  };
  let layout = page.layout_path();
  let spec = project.entry_spec(&page.page_id, &page.page_path, layout.as_deref(), true);
  let options = RenderOptions {
    page_id: page.page_id.clone(),
    script: ClientScript::Inline(generate_entry(&spec)),
    preloads: Vec::new(),
    route_module: spec.route_module.clone(),
    layout_module: spec.layout_module.clone(),
    app_layout_module: spec.app_layout_module.clone(),
    dev: true,
    hot: true,
  };
  match state.renderer.render_page(&spec.page_module, &options, &shell).await {
    Ok(rendered) => Html(rendered.html).into_response(),
    Err(e) => render_failure(path, &e),
  }
}

/// `.html` URLs map straight onto files in the routes tree.
fn html_file_response(project: &Project, path: &str) -> Response {
  let rel = path.trim_start_matches('/');
  if rel.split('/').any(|s| s.is_empty() || s.starts_with('.')) {
    return not_found();
  }
  match std::fs::read_to_string(project.routes_dir().join(rel)) {
    Ok(html) => Html(html).into_response(),
    Err(_) => not_found(),
  }
}

/// Forward request to the module server, streaming the response back.
async fn proxy_handler<H>(state: &DevState<H>, req: Request<Body>) -> Result<Response, StatusCode> {
  let path_and_query = req.uri().path_and_query().map_or(req.uri().path(), |pq| pq.as_str());
  let url = format!("{}{}", state.module_origin, path_and_query);

  let method =
    reqwest::Method::from_bytes(req.method().as_str().as_bytes()).map_err(|_| StatusCode::BAD_REQUEST)?;

  let mut builder = state.client.request(method, &url);

  // Forward headers (skip host)
  for (key, value) in req.headers() {
    if key != "host" {
      builder = builder.header(key.as_str(), value.as_bytes());
    }
  }

  let body_bytes =
    axum::body::to_bytes(req.into_body(), usize::MAX).await.map_err(|_| StatusCode::BAD_REQUEST)?;

  if !body_bytes.is_empty() {
    builder = builder.body(body_bytes);
  }

  let upstream = builder.send().await.map_err(|_| StatusCode::BAD_GATEWAY)?;

  let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

  let mut response = Response::builder().status(status);
  for (key, value) in upstream.headers() {
    response = response.header(key.as_str(), value.as_bytes());
  }

  let body = Body::from_stream(upstream.bytes_stream());
  response.body(body).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn dispatch<H: ComponentHost>(State(state): State<DevState<H>>, req: Request<Body>) -> Response {
  let path = req.uri().path().to_string();
  if is_hidden_path(&path) {
    return not_found();
  }
  if path == DEV_PREFETCH_PREFIX || path.starts_with(&format!("{DEV_PREFETCH_PREFIX}/")) {
    return prefetch_handler(&state, &path).await;
  }
  if path.ends_with(".html") {
    return html_file_response(&state.project, &path);
  }
  if is_module_request(&path) {
    // page names may contain dots; a page on disk wins over the module server
    let routes_dir = state.project.routes_dir();
    if let Some(page) = resolve_path(&routes_dir, &path, state.project.extensions()) {
      return render_response(&state, &path, &page).await;
    }
    if let Some(file) = resolve_static_html(&routes_dir, &path) {
      return static_html_response(&path, &file);
    }
    return proxy_handler(&state, req).await.unwrap_or_else(IntoResponse::into_response);
  }
  page_response(&state, &path).await
}

pub(super) fn dev_router<H: ComponentHost>(state: DevState<H>) -> Router {
  let static_name = state.project.config.dirs.r#static.trim_matches('/').to_string();
  let serve_static = ServeDir::new(state.project.static_dir());

  Router::new()
    .route(MANIFEST_URL, get(manifest_handler::<H>))
    .route(MANIFEST_URL.trim_end_matches(".json"), get(manifest_handler::<H>))
    .nest_service(&format!("/{static_name}"), serve_static)
    .fallback(dispatch::<H>)
    .with_state(state)
}

pub(super) async fn start_dev_server<H: ComponentHost>(state: DevState<H>, port: u16) -> Result<()> {
  let app = dev_router(state);
  let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
  axum::serve(listener, app).await?;
  Ok(())
}
