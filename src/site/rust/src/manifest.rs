/* src/site/rust/src/manifest.rs */

use pagewright_router::{Manifest, ManifestEntry};

use crate::bundle::OutputChunk;
use crate::hash::page_hash;
use crate::pages::PageRecord;

/// Export subdirectory holding bundled JS, data files and the manifest.
pub const ASSETS_DIR: &str = "assets";
/// Subdirectory of [`ASSETS_DIR`] holding prefetched page data.
pub const DATA_DIR: &str = "_data";

/// URL the module server serves a routes-relative source file under.
pub fn dev_module_url(routes_dir: &str, rel: &str) -> String {
  let routes = routes_dir.trim_matches('/');
  if routes.is_empty() { format!("/{rel}") } else { format!("/{routes}/{rel}") }
}

/// Manifest pointing straight at source modules, rebuilt for every dev request.
pub fn dev_manifest(pages: &[PageRecord], routes_dir: &str, app_layout_file: Option<&str>) -> Manifest {
  let mut manifest = Manifest {
    dev_app_layout_url: app_layout_file.map(|file| dev_module_url(routes_dir, file)),
    ..Default::default()
  };
  for page in pages {
    manifest.insert(
      &page.path,
      ManifestEntry {
        page_id: page.page_id.clone(),
        path: page.path.clone(),
        js: dev_module_url(routes_dir, &page.file_path),
        dev_layout_js: page.layout_path().map(|rel| dev_module_url(routes_dir, &rel)),
        ..Default::default()
      },
    );
  }
  manifest
}

/// Public URL of a page's prefetched data file.
pub fn data_url(page_id: &str) -> String {
  format!("/{ASSETS_DIR}/{DATA_DIR}/{}.json", page_hash(page_id))
}

pub fn asset_url(file_name: &str) -> String {
  format!("/{ASSETS_DIR}/{file_name}")
}

/// Manifest entry for an exported page built into `chunk`.
pub fn export_entry(page: &PageRecord, chunk: &OutputChunk, has_data: bool) -> ManifestEntry {
  ManifestEntry {
    page_id: page.page_id.clone(),
    path: page.path.clone(),
    js: asset_url(&chunk.file_name),
    preload_js: chunk.imports.iter().map(|m| asset_url(m)).collect(),
    data: has_data.then(|| data_url(&page.page_id)),
    dev_layout_js: None,
  }
}

/// Key exported entries by their route.
pub fn collect_manifest(entries: impl IntoIterator<Item = ManifestEntry>) -> Manifest {
  let mut manifest = Manifest::default();
  for entry in entries {
    let path = entry.path.clone();
    manifest.insert(&path, entry);
  }
  manifest
}
