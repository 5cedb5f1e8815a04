/* src/cli/core/src/export/copy.rs */

use std::path::Path;

use anyhow::{Context, Result};
use pagewright_renderer::minify_html;
use walkdir::WalkDir;

use super::write_file;

/// Copy `src` recursively to `dest`, verbatim. Returns the number of files copied.
pub(super) fn copy_dir(src: &Path, dest: &Path) -> Result<usize> {
  if !src.is_dir() {
    return Ok(0);
  }
  let mut count = 0;
  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
    let rel = entry.path().strip_prefix(src).context("walked outside of source dir")?;
    let target = dest.join(rel);
    if entry.file_type().is_dir() {
      std::fs::create_dir_all(&target).with_context(|| format!("failed to create {}", target.display()))?;
    } else {
      std::fs::copy(entry.path(), &target)
        .with_context(|| format!("failed to copy {} to {}", entry.path().display(), target.display()))?;
      count += 1;
    }
  }
  Ok(count)
}

/// Copy plain `.html` files from the routes tree, keeping their relative paths.
pub(super) fn copy_route_html(routes_dir: &Path, dest: &Path, minify: bool) -> Result<usize> {
  if !routes_dir.is_dir() {
    return Ok(0);
  }
  let mut count = 0;
  let walker = WalkDir::new(routes_dir)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
  for entry in walker {
    let entry = entry.with_context(|| format!("failed to walk {}", routes_dir.display()))?;
    let is_html = entry.path().extension().is_some_and(|e| e == "html");
    if !entry.file_type().is_file() || !is_html {
      continue;
    }
    let rel = entry.path().strip_prefix(routes_dir).context("walked outside of routes dir")?;
    let html = std::fs::read_to_string(entry.path())
      .with_context(|| format!("failed to read {}", entry.path().display()))?;
    let html = if minify { minify_html(&html) } else { html };
    write_file(&dest.join(rel), &html)?;
    count += 1;
  }
  Ok(count)
}
