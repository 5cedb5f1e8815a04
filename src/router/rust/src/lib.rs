/* src/router/rust/src/lib.rs */

pub mod errors;
pub mod hydrate;
pub mod manifest;
pub mod module;
pub mod path;
pub mod platform;
pub mod root;
pub mod router;

#[cfg(test)]
mod tests;

// Re-exports for ergonomic use
pub use errors::PlatformError;
pub use hydrate::{StartOptions, start};
pub use manifest::{DEV_PREFETCH_PREFIX, MANIFEST_URL, Manifest, ManifestEntry};
pub use module::{ClientFetch, Layer, ModuleRecord, PageModule, Props, RouteProps, merge_props};
pub use path::{ParamValue, Params, normalize_pathname, parse_params};
pub use platform::{Platform, PreloadLink};
pub use root::{Mount, RootHandle, RoutePatch, RouteState};
pub use router::{Mode, Navigation, PRELOAD_IDLE_MS, Router};
