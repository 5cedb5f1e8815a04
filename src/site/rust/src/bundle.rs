/* src/site/rust/src/bundle.rs */

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Prefix bundlers put on the ids of virtual (in-memory) modules.
pub const VIRTUAL_PREFIX: &str = "\0virtual:";

/// What the bundler is asked to build: one virtual entry per page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePlan {
  /// Entry name (the page's routes-relative file path) -> generated code.
  pub entries: BTreeMap<String, String>,
  pub out_dir: PathBuf,
  pub routes_dir: PathBuf,
  pub extensions: Vec<String>,
  pub dev: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
  pub file_name: String,
  #[serde(default)]
  pub facade_module_id: Option<String>,
  /// File names of the chunks this one statically imports.
  #[serde(default)]
  pub imports: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleOutput {
  #[serde(default)]
  pub chunks: Vec<OutputChunk>,
  /// Compiled component source keyed by routes-relative file path.
  #[serde(default)]
  pub compiled: BTreeMap<String, String>,
}

impl BundleOutput {
  /// Entry chunks keyed by the virtual entry they were built from.
  pub fn index_by_entry(&self) -> HashMap<&str, &OutputChunk> {
    self
      .chunks
      .iter()
      .filter_map(|chunk| {
        let id = chunk.facade_module_id.as_deref()?;
        Some((id.strip_prefix(VIRTUAL_PREFIX).unwrap_or(id), chunk))
      })
      .collect()
  }
}
