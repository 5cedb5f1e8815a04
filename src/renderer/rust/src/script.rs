/* src/renderer/rust/src/script.rs */

use std::fmt::Write;

use pagewright_router::Props;

use crate::assets::GlobalFile;
use crate::escape::{escape_attr, script_json};

/// How the page's entry module reaches the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientScript {
  /// Entry code embedded in the document (dev server).
  Inline(String),
  /// URL of the bundled entry chunk (static export).
  Linked(String),
  /// Server-rendered HTML only, no hydration.
  None,
}

/// Modulepreload links, the hydration script, then global JS as classic scripts.
pub fn script_block(
  script: &ClientScript,
  preloads: &[String],
  page_props: &Props,
  global_js: &[GlobalFile],
) -> Result<String, serde_json::Error> {
  let mut out = String::new();
  for href in preloads {
    let _ = writeln!(out, r#"<link rel="modulepreload" href="{}">"#, escape_attr(href));
  }

  let start = format!("start({{ pageProps: {}, hydrate: true }});", script_json(page_props)?);
  match script {
    ClientScript::Inline(code) => {
      let _ = writeln!(out, "<script type=\"module\">\n{code}\n{start}\n</script>");
    }
    ClientScript::Linked(src) => {
      let _ = writeln!(out, "<script type=\"module\">\nimport {{ start }} from {};\n{start}\n</script>", script_json(src)?);
    }
    ClientScript::None => {}
  }

  for file in global_js {
    let _ = writeln!(out, "<script>{}</script>", file.code);
  }
  Ok(out.trim_end().to_string())
}

/// Hot-mode module script: pull global CSS through the module server, then
/// drop the server-rendered copies.
pub fn hot_script(global_css: &[GlobalFile]) -> Result<String, serde_json::Error> {
  let mut out = String::from("<script type=\"module\">\n");
  for file in global_css {
    let _ = writeln!(out, "import {};", script_json(&file.url)?);
  }
  out.push_str("document.querySelectorAll('[data-style-dev]').forEach(el => el.remove());\n</script>");
  Ok(out)
}
