/* src/site/rust/src/pages.rs */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pagewright_router::normalize_pathname;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::errors::SiteError;

/// Stem of the per-directory layout file.
pub const LAYOUT_STEM: &str = "_layout";
/// Stem of the app-wide layout file at the routes root.
pub const APP_LAYOUT_STEM: &str = "_app";

/// One page source file found under the routes dir. Paths use `/` on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
  /// `blog/post-1`, `index`
  pub page_id: String,
  /// Route: `/blog/post-1`, `/` for the root index.
  pub path: String,
  /// Directory relative to the routes dir, empty at the root.
  pub dir: String,
  pub has_layout: bool,
  /// Layout file name inside `dir`, e.g. `_layout.svelte`.
  pub layout_file: Option<String>,
  /// `blog/post-1.svelte`
  pub file_path: String,
  /// `post-1.svelte`
  pub name: String,
}

impl PageRecord {
  pub fn stem(&self) -> &str {
    self.name.rsplit_once('.').map_or(self.name.as_str(), |(stem, _)| stem)
  }

  pub fn ext(&self) -> &str {
    self.name.rsplit_once('.').map_or("", |(_, ext)| ext)
  }

  /// Layout path relative to the routes dir.
  pub fn layout_path(&self) -> Option<String> {
    self.layout_file.as_deref().map(|file| join_rel(&self.dir, file))
  }
}

pub(crate) fn join_rel(dir: &str, name: &str) -> String {
  if dir.is_empty() { name.to_string() } else { format!("{dir}/{name}") }
}

pub(crate) fn split_name(name: &str) -> Option<(&str, &str)> {
  name.rsplit_once('.').filter(|(stem, _)| !stem.is_empty())
}

pub(crate) fn is_reserved(stem: &str) -> bool {
  stem == LAYOUT_STEM || stem == APP_LAYOUT_STEM
}

/// `<stem>.<ext>` inside `dir` for the first configured extension that exists.
pub fn find_special(dir: &Path, stem: &str, extensions: &[String]) -> Option<String> {
  extensions.iter().map(|ext| format!("{stem}.{ext}")).find(|name| dir.join(name).is_file())
}

fn is_hidden(entry: &DirEntry) -> bool {
  entry.depth() > 0 && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn rel_path(root: &Path, path: &Path) -> String {
  let rel = path.strip_prefix(root).unwrap_or(path);
  rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

/// Route for a page file: `index` names its directory.
pub(crate) fn route_for(dir: &str, stem: &str) -> String {
  if stem == "index" {
    normalize_pathname(&format!("/{dir}"))
  } else {
    normalize_pathname(&format!("/{}", join_rel(dir, stem)))
  }
}

/// Every page under `routes_dir`, sorted by file path.
///
/// Files whose extension is not in `extensions`, layout files and hidden
/// entries are skipped. A directory's layout applies to the pages directly
/// inside it and is not inherited by subdirectories.
pub fn list_pages(routes_dir: &Path, extensions: &[String]) -> Result<Vec<PageRecord>, SiteError> {
  let mut layouts: HashMap<PathBuf, Option<String>> = HashMap::new();
  let mut pages = Vec::new();

  let walker = WalkDir::new(routes_dir).sort_by_file_name().into_iter().filter_entry(|e| !is_hidden(e));
  for entry in walker {
    let entry = entry?;
    if !entry.file_type().is_file() {
      continue;
    }
    let name = entry.file_name().to_string_lossy().into_owned();
    let Some((stem, ext)) = split_name(&name) else {
      continue;
    };
    if is_reserved(stem) || !extensions.iter().any(|e| e == ext) {
      continue;
    }

    let parent = entry.path().parent().unwrap_or(routes_dir).to_path_buf();
    let layout_file = layouts
      .entry(parent.clone())
      .or_insert_with(|| find_special(&parent, LAYOUT_STEM, extensions))
      .clone();
    let dir = rel_path(routes_dir, &parent);

    pages.push(PageRecord {
      page_id: join_rel(&dir, stem),
      path: route_for(&dir, stem),
      has_layout: layout_file.is_some(),
      layout_file,
      file_path: join_rel(&dir, &name),
      name: name.clone(),
      dir,
    });
  }

  pages.sort_by(|a, b| a.file_path.cmp(&b.file_path));
  Ok(pages)
}
