/* src/cli/core/src/export/mod.rs */

mod copy;
mod page;


use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use pagewright_renderer::{ComponentHost, RenderError, Renderer};
use pagewright_router::ManifestEntry;
use pagewright_site::{ASSETS_DIR, BundleOutput, BundlePlan, PageRecord, collect_manifest, generate_entry, list_pages};
use tokio::task::JoinSet;

use crate::bundler::run_bundler;
use crate::host::NodeHost;
use crate::project::Project;
use crate::ui::{self, DIM, RESET};

use copy::{copy_dir, copy_route_html};
use page::{ExportContext, export_page, to_json};

const TOTAL_STEPS: u32 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
  /// Unminified output with tab-indented JSON.
  pub dev: bool,
  pub view_source: bool,
}

fn write_file(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// One generated entry module per page, keyed by the page's source path.
fn generate_entries(project: &Project, pages: &[PageRecord]) -> BTreeMap<String, String> {
  pages
    .iter()
    .map(|page| {
      let layout = page.layout_path();
      let spec = project.entry_spec(&page.page_id, &page.file_path, layout.as_deref(), false);
      (page.file_path.clone(), generate_entry(&spec))
    })
    .collect()
}

fn report_failure(page: &str, err: &anyhow::Error) {
  ui::fail(&format!("failed to export {page}: {err:#}"));
  if let Some(render) = err.downcast_ref::<RenderError>() {
    for line in render.stack().lines() {
      ui::detail(&format!("{DIM}{line}{RESET}"));
    }
  }
}

/// Render every page concurrently. Returns the manifest entries of the pages
/// that succeeded and the number that failed; each failure is reported as it
/// is joined.
async fn render_pages<H: ComponentHost>(
  ctx: Arc<ExportContext<H>>,
  pages: &[PageRecord],
  bundle: &BundleOutput,
  entries: &BTreeMap<String, String>,
) -> (Vec<ManifestEntry>, usize) {
  let chunks = bundle.index_by_entry();
  let mut failed = 0;
  let mut set = JoinSet::new();

  for page in pages {
    let Some(chunk) = chunks.get(page.file_path.as_str()) else {
      report_failure(&page.file_path, &anyhow::anyhow!("bundler produced no entry chunk"));
      failed += 1;
      continue;
    };
    let ctx = ctx.clone();
    let page = page.clone();
    let chunk = (*chunk).clone();
    let entry_code = entries.get(&page.file_path).cloned().unwrap_or_default();
    set.spawn(async move {
      let result = export_page(&ctx, &page, &chunk, &entry_code).await;
      (page.file_path, result)
    });
  }

  let mut exported = Vec::new();
  while let Some(joined) = set.join_next().await {
    match joined {
      Ok((_, Ok(entry))) => exported.push(entry),
      Ok((page, Err(err))) => {
        report_failure(&page, &err);
        failed += 1;
      }
      Err(err) => {
        ui::fail(&format!("page task aborted: {err}"));
        failed += 1;
      }
    }
  }
  (exported, failed)
}

pub async fn run_export(project: Project, options: ExportOptions) -> Result<()> {
  let started = Instant::now();
  ui::banner("export", &project.name);

  ui::step(1, TOTAL_STEPS, "Scanning pages");
  let routes_dir = project.routes_dir();
  let pages = list_pages(&routes_dir, project.extensions())
    .with_context(|| format!("failed to list pages in {}", routes_dir.display()))?;
  if pages.is_empty() {
    ui::warn(&format!("no pages found in {}", routes_dir.display()));
  }
  ui::detail_ok(&format!("{} pages", pages.len()));

  ui::step(2, TOTAL_STEPS, "Bundling entries");
  let export_dir = project.export_dir();
  let entries = generate_entries(&project, &pages);
  let plan = BundlePlan {
    entries: entries.clone(),
    out_dir: export_dir.join(ASSETS_DIR),
    routes_dir: routes_dir.clone(),
    extensions: project.extensions().to_vec(),
    dev: options.dev,
  };
  let bundle = run_bundler(&project.root, &project.config.runtime.bundler_script, &plan).await?;
  ui::detail_ok(&format!("{} chunks", bundle.chunks.len()));

  ui::step(3, TOTAL_STEPS, "Rendering pages");
  let host = NodeHost::spawn(&project.root, &project.config.runtime.host_script, None)?;
  let shell = project.page_shell()?;
  let compiled = bundle.compiled.clone();
  let ctx = Arc::new(ExportContext {
    project: project.clone(),
    renderer: Renderer::new(Arc::new(host)),
    shell,
    dev: options.dev,
    view_source: options.view_source,
    compiled,
  });
  let (exported, failed) = render_pages(ctx, &pages, &bundle, &entries).await;
  if failed > 0 {
    bail!("{failed} of {} pages failed to export ({:.2}s)", pages.len(), started.elapsed().as_secs_f64());
  }
  ui::detail_ok(&format!("{} pages rendered", exported.len()));

  ui::step(4, TOTAL_STEPS, "Writing manifest");
  let manifest = collect_manifest(exported);
  let manifest_path = export_dir.join(ASSETS_DIR).join("manifest.json");
  let json = to_json(&manifest, options.dev)?;
  write_file(&manifest_path, &json)?;
  ui::detail_ok(&format!("{}  {}", manifest_path.display(), ui::format_size(json.len() as u64)));

  ui::step(5, TOTAL_STEPS, "Copying static files");
  let static_dir = project.static_dir();
  let static_name = static_dir.file_name().map_or_else(|| "static".into(), |n| n.to_os_string());
  let copied = copy_dir(&static_dir, &export_dir.join(static_name))?;
  let html = copy_route_html(&routes_dir, &export_dir, !options.dev)?;
  ui::detail_ok(&format!("{copied} static files, {html} html files"));

  ui::blank();
  ui::ok(&format!(
    "exported {} pages to {} in {:.2}s",
    manifest.paths.len(),
    export_dir.display(),
    started.elapsed().as_secs_f64()
  ));
  Ok(())
}
