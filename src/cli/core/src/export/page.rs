/* src/cli/core/src/export/page.rs */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use pagewright_renderer::{ClientScript, ComponentHost, PageShell, RenderOptions, Renderer};
use pagewright_router::ManifestEntry;
use pagewright_site::{OutputChunk, PageRecord, asset_url, data_url, export_entry};
use serde::Serialize;

use super::write_file;
use crate::project::Project;

/// State shared by every page task of one export.
pub(super) struct ExportContext<H> {
  pub project: Project,
  pub renderer: Renderer<H>,
  pub shell: PageShell,
  pub dev: bool,
  pub view_source: bool,
  /// Compiled component sources reported by the bundler.
  pub compiled: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ViewSource<'a> {
  ext: &'a str,
  main: String,
  entry: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  compiled: Option<&'a str>,
}

pub(super) fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
  if !pretty {
    return Ok(serde_json::to_string(value)?);
  }
  let mut buf = Vec::new();
  let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
  let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
  value.serialize(&mut ser)?;
  Ok(String::from_utf8(buf)?)
}

fn export_path(export_dir: &Path, url: &str) -> std::path::PathBuf {
  export_dir.join(url.trim_start_matches('/'))
}

/// Render one page and write its HTML, data file and view-source artifact.
pub(super) async fn export_page<H: ComponentHost>(
  ctx: &ExportContext<H>,
  page: &PageRecord,
  chunk: &OutputChunk,
  entry_code: &str,
) -> Result<ManifestEntry> {
  let project = &ctx.project;
  let js = asset_url(&chunk.file_name);
  let mut preloads: Vec<String> = chunk.imports.iter().map(|m| asset_url(m)).collect();
  preloads.push(js.clone());

  let options = RenderOptions {
    page_id: page.page_id.clone(),
    script: ClientScript::Linked(js),
    preloads,
    route_module: project.route_module(false).to_string(),
    layout_module: page.layout_path().map(|rel| project.module_url(&rel)),
    app_layout_module: project.app_layout_file().map(|file| project.module_url(&file)),
    dev: ctx.dev,
    hot: false,
  };
  let rendered = ctx.renderer.render_page(&project.module_url(&page.file_path), &options, &ctx.shell).await?;

  let export_dir = project.export_dir();
  let html_path = export_dir.join(&page.dir).join(format!("{}.html", page.stem()));
  write_file(&html_path, &rendered.html)?;

  let data = rendered.prefetched_props.filter(|props| !props.is_empty());
  if let Some(props) = &data {
    write_file(&export_path(&export_dir, &data_url(&page.page_id)), &to_json(props, ctx.dev)?)?;
  }

  if ctx.view_source {
    let source_path = project.routes_dir().join(&page.file_path);
    let main = std::fs::read_to_string(&source_path)
      .with_context(|| format!("failed to read {}", source_path.display()))?;
    let sources = ViewSource {
      ext: page.ext(),
      main,
      entry: entry_code,
      compiled: ctx.compiled.get(&page.file_path).map(String::as_str),
    };
    let path = export_dir.join("view-source/entries").join(format!("{}.json", page.page_id));
    write_file(&path, &serde_json::to_string(&sources)?)?;
  }

  Ok(export_entry(page, chunk, data.is_some()))
}
