/* src/renderer/rust/src/document.rs */

use std::sync::OnceLock;

use regex::Regex;

/// Base document used when the project has no template of its own.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>app built with pagewright</title>
    <meta
      name="viewport"
      content="width=device-width,initial-scale=1"
    />
  </head>
  <body></body>
</html>
"#;

const HEAD_MARKER: &str = "<!-- @HEAD -->";
const CSS_MARKER: &str = "<!-- @CSS -->";
const SCRIPT_MARKER: &str = "<!-- @SCRIPT -->";
const HTML_MARKER: &str = "<!-- @HTML -->";

/// Rendered pieces spliced into the base document.
#[derive(Debug, Clone, Default)]
pub struct Fragments<'a> {
  pub head: &'a str,
  pub css: &'a str,
  pub script: &'a str,
  /// Module script that swaps server styles for live ones in hot mode.
  pub hot: &'a str,
  pub html: &'a str,
}

fn body_open() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(?i)<body\b[^>]*>").unwrap())
}

/// Splice fragments into `template`.
///
/// Templates that carry the `<!-- @HTML -->` marker get each fragment at its
/// marker; fragments whose marker is missing go before `</head>`. Other
/// templates get css, script, head and hot code before `</head>` and the
/// root HTML right after the opening `<body>` tag.
pub fn assemble(template: &str, fragments: &Fragments<'_>) -> String {
  if template.contains(HTML_MARKER) {
    let mut doc = template.replace(HTML_MARKER, fragments.html);
    let mut unplaced = Vec::new();
    for (marker, code) in [(CSS_MARKER, fragments.css), (SCRIPT_MARKER, fragments.script), (HEAD_MARKER, fragments.head)] {
      if doc.contains(marker) {
        doc = doc.replace(marker, code);
      } else {
        unplaced.push(code);
      }
    }
    unplaced.push(fragments.hot);
    return insert_head(&doc, &unplaced);
  }

  let doc = insert_head(template, &[fragments.css, fragments.script, fragments.head, fragments.hot]);
  match body_open().find(&doc) {
    Some(m) => format!("{}\n{}{}", &doc[..m.end()], fragments.html, &doc[m.end()..]),
    None => format!("{doc}\n{}", fragments.html),
  }
}

fn insert_head(doc: &str, parts: &[&str]) -> String {
  let code: Vec<&str> = parts.iter().copied().filter(|s| !s.is_empty()).collect();
  if code.is_empty() {
    return doc.to_string();
  }
  let code = code.join("\n");
  match doc.find("</head>") {
    Some(at) => format!("{}{code}\n{}", &doc[..at], &doc[at..]),
    None => format!("{code}\n{doc}"),
  }
}
