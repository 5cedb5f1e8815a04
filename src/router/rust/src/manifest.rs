/* src/router/rust/src/manifest.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::path::normalize_pathname;

/// Fixed URL the client fetches the route manifest from, in dev and in export.
pub const MANIFEST_URL: &str = "/assets/manifest.json";

/// Dev-only endpoint returning a page's server-prefetched props as JSON.
pub const DEV_PREFETCH_PREFIX: &str = "/_dev_prefetch";

/// The route manifest the client router reads.
///
/// Keys of `paths` are normalized pathnames. The dev server adds
/// `__dev__appLayoutUrl`; exported manifests omit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
  #[serde(
    rename = "__dev__appLayoutUrl",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub dev_app_layout_url: Option<String>,
  #[serde(default)]
  pub paths: BTreeMap<String, ManifestEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
  pub page_id: String,
  #[serde(default)]
  pub path: String,
  pub js: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub preload_js: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<String>,
  #[serde(rename = "__dev__layoutJs", default, skip_serializing_if = "Option::is_none")]
  pub dev_layout_js: Option<String>,
}

impl Manifest {
  /// Look up a route by any spelling of its pathname.
  pub fn entry(&self, pathname: &str) -> Option<&ManifestEntry> {
    self.paths.get(&normalize_pathname(pathname))
  }

  /// Insert under the normalized pathname, returning the previous entry if any.
  pub fn insert(&mut self, pathname: &str, entry: ManifestEntry) -> Option<ManifestEntry> {
    self.paths.insert(normalize_pathname(pathname), entry)
  }
}
