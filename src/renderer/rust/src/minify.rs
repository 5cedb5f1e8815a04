/* src/renderer/rust/src/minify.rs */

use std::sync::OnceLock;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use regex::{Captures, Regex};

/// Elements whose content is whitespace-sensitive or not HTML.
fn protected() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r"(?is)<pre\b[^>]*>.*?</pre\s*>|<textarea\b[^>]*>.*?</textarea\s*>|<script\b[^>]*>.*?</script\s*>|<style\b(?P<attrs>[^>]*)>(?P<css>.*?)</style\s*>",
    )
    .unwrap()
  })
}

fn whitespace() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Minify a stylesheet. `None` when it does not parse.
pub fn minify_css(css: &str) -> Option<String> {
  let mut sheet = StyleSheet::parse(css, ParserOptions::default()).ok()?;
  sheet.minify(MinifyOptions::default()).ok()?;
  let out = sheet.to_css(PrinterOptions { minify: true, ..Default::default() }).ok()?;
  Some(out.code)
}

fn minify_style(caps: &Captures<'_>) -> String {
  let attrs = caps.name("attrs").map_or("", |m| m.as_str());
  let css = caps.name("css").map_or("", |m| m.as_str());
  match minify_css(css) {
    Some(min) => format!("<style{attrs}>{min}</style>"),
    None => caps[0].to_string(),
  }
}

/// Conservative HTML minification.
///
/// Whitespace runs outside `pre`, `textarea`, `script` and `style` collapse
/// to one space and are never removed entirely. Inline styles are minified;
/// ones that fail to parse are kept as they are.
pub fn minify_html(html: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut last = 0;
  for caps in protected().captures_iter(html) {
    let Some(whole) = caps.get(0) else {
      continue;
    };
    out.push_str(&whitespace().replace_all(&html[last..whole.start()], " "));
    if caps.name("css").is_some() {
      out.push_str(&minify_style(&caps));
    } else {
      out.push_str(whole.as_str());
    }
    last = whole.end();
  }
  out.push_str(&whitespace().replace_all(&html[last..], " "));
  out.trim().to_string()
}
