/* src/cli/core/src/init.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagewright_renderer::DEFAULT_TEMPLATE;

use crate::project::Project;
use crate::ui;

const GLOBAL_CSS: &str = "body {\n  font-family: system-ui, sans;\n}\n";

const INDEX_PAGE: &str = r#"<div style="width: 640px; margin: 0 auto;">
  <h1 style="text-align: center;">pagewright app</h1>
</div>
"#;

fn create_dir(path: &Path, created: &mut Vec<PathBuf>) -> Result<()> {
  if !path.exists() {
    std::fs::create_dir_all(path).with_context(|| format!("failed to create {}", path.display()))?;
    created.push(path.to_path_buf());
  }
  Ok(())
}

fn create_file(path: &Path, content: &str, created: &mut Vec<PathBuf>) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
  created.push(path.to_path_buf());
  Ok(())
}

/// Scaffold the conventional layout. Existing files and directories are
/// left alone; the global and routes starters are only written when their
/// directory is missing.
pub fn scaffold(project: &Project) -> Result<Vec<PathBuf>> {
  let mut created = Vec::new();
  create_dir(&project.static_dir(), &mut created)?;

  let global_dir = project.global_dir();
  if !global_dir.exists() {
    create_file(&global_dir.join("global.css"), GLOBAL_CSS, &mut created)?;
  }

  let routes_dir = project.routes_dir();
  if !routes_dir.exists() {
    let ext = project.extensions().first().map_or("svelte", String::as_str);
    create_file(&routes_dir.join(format!("index.{ext}")), INDEX_PAGE, &mut created)?;
  }

  let template = project.template_path();
  if !template.exists() {
    create_file(&template, DEFAULT_TEMPLATE, &mut created)?;
  }
  Ok(created)
}

pub fn run_init(project: &Project) -> Result<()> {
  ui::banner("init", &project.name);
  let created = scaffold(project)?;
  if created.is_empty() {
    ui::arrow("nothing to do, project already initialized");
    return Ok(());
  }
  for path in &created {
    let shown = path.strip_prefix(&project.root).unwrap_or(path);
    ui::ok(&format!("created {}", shown.display()));
  }
  ui::blank();
  ui::arrow("run `pagewright dev` to start the dev server");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::PagewrightConfig;

  fn project(root: &Path) -> Project {
    Project::new(root.to_path_buf(), PagewrightConfig::default())
  }

  #[test]
  fn scaffolds_empty_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let created = scaffold(&project(tmp.path())).unwrap();
    assert_eq!(created.len(), 4);
    assert!(tmp.path().join("static").is_dir());
    assert_eq!(std::fs::read_to_string(tmp.path().join("global/global.css")).unwrap(), GLOBAL_CSS);
    assert!(std::fs::read_to_string(tmp.path().join("routes/index.svelte")).unwrap().contains("<h1"));
    assert_eq!(std::fs::read_to_string(tmp.path().join("index.html")).unwrap(), DEFAULT_TEMPLATE);
  }

  #[test]
  fn never_overwrites() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("routes")).unwrap();
    std::fs::write(tmp.path().join("index.html"), "<mine/>").unwrap();

    let created = scaffold(&project(tmp.path())).unwrap();
    assert_eq!(created.len(), 2);
    assert!(!tmp.path().join("routes/index.svelte").exists());
    assert_eq!(std::fs::read_to_string(tmp.path().join("index.html")).unwrap(), "<mine/>");
  }

  #[test]
  fn second_run_is_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    scaffold(&project(tmp.path())).unwrap();
    assert!(scaffold(&project(tmp.path())).unwrap().is_empty());
  }
}
