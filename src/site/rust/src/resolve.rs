/* src/site/rust/src/resolve.rs */

use std::path::{Path, PathBuf};

use crate::pages::{LAYOUT_STEM, find_special, is_reserved, join_rel, split_name};

/// A URL path resolved to a page source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
  pub page_id: String,
  /// Source path relative to the routes dir, e.g. `blog/post-1.svelte`.
  pub page_path: String,
  /// Directory relative to the routes dir, empty at the root.
  pub dir: String,
  pub file_name: String,
  pub ext: String,
  pub has_layout: bool,
  pub layout_file: Option<String>,
  pub is_directory_index: bool,
}

impl ResolvedPage {
  pub fn layout_path(&self) -> Option<String> {
    self.layout_file.as_deref().map(|file| join_rel(&self.dir, file))
  }
}

/// Split a URL path into `(dir, base, is_directory_index)` relative to the
/// routes dir. `None` for traversal, hidden or reserved segments.
fn locate(routes_dir: &Path, url_path: &str) -> Option<(String, String, bool)> {
  let trimmed = url_path.trim_matches('/');
  if trimmed.is_empty() {
    return Some((String::new(), "index".into(), true));
  }
  let segments: Vec<&str> = trimmed.split('/').collect();
  if segments.iter().any(|s| s.is_empty() || s.starts_with('.')) {
    return None;
  }
  if is_reserved(segments[segments.len() - 1]) {
    return None;
  }

  if routes_dir.join(trimmed).is_dir() {
    return Some((trimmed.to_string(), "index".into(), true));
  }
  let (dir, base) = trimmed.rsplit_once('/').unwrap_or(("", trimmed));
  Some((dir.to_string(), base.to_string(), false))
}

/// Resolve a URL path to the page file that renders it.
///
/// `/` and directories map to their `index` page; a trailing slash is
/// ignored. The first file (by name) in the target directory whose stem
/// equals the last segment and whose extension is a page extension wins.
pub fn resolve_path(routes_dir: &Path, url_path: &str, extensions: &[String]) -> Option<ResolvedPage> {
  let (dir, base, is_directory_index) = locate(routes_dir, url_path)?;
  let dir_path = routes_dir.join(&dir);

  let mut names: Vec<String> = std::fs::read_dir(&dir_path)
    .ok()?
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
    .filter_map(|e| e.file_name().into_string().ok())
    .collect();
  names.sort();

  let (file_name, ext) = names.into_iter().find_map(|name| {
    let (stem, ext) = split_name(&name)?;
    let matches = stem == base && extensions.iter().any(|e| e == ext);
    let ext = ext.to_string();
    matches.then_some((name, ext))
  })?;

  let layout_file = find_special(&dir_path, LAYOUT_STEM, extensions);
  Some(ResolvedPage {
    page_id: join_rel(&dir, &base),
    page_path: join_rel(&dir, &file_name),
    has_layout: layout_file.is_some(),
    layout_file,
    file_name,
    ext,
    is_directory_index,
    dir,
  })
}

/// Fallback for URLs without a page: a plain `.html` file in the routes tree.
pub fn resolve_static_html(routes_dir: &Path, url_path: &str) -> Option<PathBuf> {
  let (dir, base, _) = locate(routes_dir, url_path)?;
  let path = routes_dir.join(dir).join(format!("{base}.html"));
  path.is_file().then_some(path)
}
