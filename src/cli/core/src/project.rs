/* src/cli/core/src/project.rs */

// Resolved project layout: config plus the directory it applies to.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagewright_renderer::PageShell;
use pagewright_site::{APP_LAYOUT_STEM, EntrySpec, dev_module_url, find_special};

use crate::config::{PagewrightConfig, find_config, load_config};

#[derive(Debug, Clone)]
pub struct Project {
  pub root: PathBuf,
  pub name: String,
  pub config: PagewrightConfig,
}

impl Project {
  pub fn new(root: PathBuf, config: PagewrightConfig) -> Self {
    let name = config.project.name.clone().unwrap_or_else(|| {
      root.file_name().and_then(|n| n.to_str()).unwrap_or("pagewright").to_string()
    });
    Self { root, name, config }
  }

  /// Explicit config path, else discovery from the working directory, else
  /// defaults rooted at the working directory.
  pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
    let cwd = std::env::current_dir().context("failed to get cwd")?;
    let path = match explicit {
      Some(p) => Some(p),
      None => find_config(&cwd)?,
    };
    match path {
      Some(path) => {
        let config = load_config(&path)?;
        let root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
        Ok(Self::new(root, config))
      }
      None => Ok(Self::new(cwd, PagewrightConfig::default())),
    }
  }

  pub fn routes_dir(&self) -> PathBuf {
    self.root.join(&self.config.dirs.routes)
  }

  pub fn export_dir(&self) -> PathBuf {
    self.root.join(&self.config.dirs.export)
  }

  pub fn static_dir(&self) -> PathBuf {
    self.root.join(&self.config.dirs.r#static)
  }

  pub fn global_dir(&self) -> PathBuf {
    self.root.join(&self.config.dirs.global)
  }

  pub fn template_path(&self) -> PathBuf {
    self.root.join(&self.config.dirs.template)
  }

  pub fn extensions(&self) -> &[String] {
    &self.config.pages.extensions
  }

  /// Module specifier of a routes-relative source file.
  pub fn module_url(&self, rel: &str) -> String {
    dev_module_url(&self.config.dirs.routes, rel)
  }

  /// `_app.<ext>` at the routes root, if present.
  pub fn app_layout_file(&self) -> Option<String> {
    find_special(&self.routes_dir(), APP_LAYOUT_STEM, self.extensions())
  }

  fn index_module(&self) -> Option<String> {
    let rel = self.config.dirs.index_module.trim_start_matches('/');
    self.root.join(rel).is_file().then(|| format!("/{rel}"))
  }

  pub fn route_module(&self, dev: bool) -> &str {
    let runtime = &self.config.runtime;
    if dev { &runtime.route_module_dev } else { &runtime.route_module }
  }

  /// Entry inputs for a page given its routes-relative source and layout paths.
  pub fn entry_spec(&self, page_id: &str, page_path: &str, layout_path: Option<&str>, dev: bool) -> EntrySpec {
    let runtime = &self.config.runtime;
    EntrySpec {
      page_id: page_id.to_string(),
      index_module: self.index_module(),
      page_module: self.module_url(page_path),
      layout_module: layout_path.map(|rel| self.module_url(rel)),
      app_layout_module: self.app_layout_file().map(|file| self.module_url(&file)),
      route_module: self.route_module(dev).to_string(),
      runtime_module: if dev { runtime.router_module_dev.clone() } else { runtime.router_module.clone() },
      spa: self.config.pages.spa,
      dev,
    }
  }

  /// Base document and global assets, read fresh from disk.
  pub fn page_shell(&self) -> Result<PageShell> {
    let global_url = self.config.dirs.global.trim_matches('/');
    PageShell::load(&self.template_path(), &self.global_dir(), global_url)
      .with_context(|| format!("failed to load page shell from {}", self.root.display()))
  }
}
