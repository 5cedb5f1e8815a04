/* src/renderer/rust/src/escape.rs */

use serde::Serialize;

/// Serialize for embedding in an inline `<script>`.
///
/// `<`, `>` and `&` become `\u` escapes so the payload can never close the
/// element or open a comment; U+2028/U+2029 are escaped for pre-ES2019 parsers.
/// Those characters only occur inside JSON strings, where the escapes decode
/// to the same text.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
  let json = serde_json::to_string(value)?;
  let mut out = String::with_capacity(json.len());
  for ch in json.chars() {
    match ch {
      '<' => out.push_str("\\u003c"),
      '>' => out.push_str("\\u003e"),
      '&' => out.push_str("\\u0026"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      _ => out.push(ch),
    }
  }
  Ok(out)
}

/// Escape text for a double-quoted HTML attribute value.
pub fn escape_attr(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(ch),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;

  #[test]
  fn script_close_cannot_escape() {
    let out = script_json(&json!({"html": "</script><script>alert(1)</script>"})).unwrap();
    assert!(!out.contains("</script>"));
    assert!(!out.contains('<'));
  }

  #[test]
  fn decodes_to_same_value() {
    let value = json!({"a": "x < y && y > z", "b": "line\u{2028}sep", "n": [1, 2]});
    let out = script_json(&value).unwrap();
    let back: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(back, value);
  }

  #[test]
  fn plain_values_untouched() {
    assert_eq!(script_json(&json!({"count": 1})).unwrap(), r#"{"count":1}"#);
  }

  #[test]
  fn attr_escaping() {
    assert_eq!(escape_attr(r#"/a?x=1&y="2""#), "/a?x=1&amp;y=&quot;2&quot;");
  }
}
