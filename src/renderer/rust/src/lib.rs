/* src/renderer/rust/src/lib.rs */

pub mod assets;
pub mod document;
pub mod errors;
pub mod escape;
pub mod host;
pub mod minify;
pub mod render;
pub mod script;

pub use assets::{GlobalAssets, GlobalFile};
pub use document::{DEFAULT_TEMPLATE, Fragments, assemble};
pub use errors::{HostError, RenderError, RenderStage};
pub use escape::{escape_attr, script_json};
pub use host::{BoxFuture, ComponentHost, CssOutput, ModuleInfo, PrefetchArgs, RenderOutput, RouteRenderRequest};
pub use minify::{minify_css, minify_html};
pub use render::{PageShell, RenderOptions, RenderedPage, Renderer};
pub use script::{ClientScript, hot_script, script_block};
