/* src/site/rust/src/lib.rs */

pub mod bundle;
pub mod entry;
pub mod errors;
pub mod hash;
pub mod manifest;
pub mod pages;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use bundle::{BundleOutput, BundlePlan, OutputChunk, VIRTUAL_PREFIX};
pub use entry::{EntrySpec, generate_entry};
pub use errors::SiteError;
pub use hash::page_hash;
pub use manifest::{
  ASSETS_DIR, DATA_DIR, asset_url, collect_manifest, data_url, dev_manifest, dev_module_url,
  export_entry,
};
pub use pages::{APP_LAYOUT_STEM, LAYOUT_STEM, PageRecord, find_special, list_pages};
pub use resolve::{ResolvedPage, resolve_path, resolve_static_html};
