/* src/router/rust/src/path.rs */

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

/// A query-string value: scalar for a key seen once, list for repeated keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
  One(String),
  Many(Vec<String>),
}

impl ParamValue {
  fn push(&mut self, value: String) {
    match self {
      Self::One(first) => *self = Self::Many(vec![std::mem::take(first), value]),
      Self::Many(values) => values.push(value),
    }
  }

  pub fn first(&self) -> &str {
    match self {
      Self::One(v) => v,
      Self::Many(values) => values.first().map_or("", String::as_str),
    }
  }
}

pub type Params = BTreeMap<String, ParamValue>;

/// Strip trailing slashes; the root (and the empty path) becomes `/`.
///
/// Both the manifest builder and the router key routes through this function,
/// so a link written with or without a trailing slash reaches the same entry.
pub fn normalize_pathname(pathname: &str) -> String {
  let trimmed = pathname.trim_end_matches('/');
  if trimmed.is_empty() {
    "/".to_string()
  } else if trimmed.starts_with('/') {
    trimmed.to_string()
  } else {
    format!("/{trimmed}")
  }
}

/// Parse a query string (with or without the leading `?`) the way
/// `URLSearchParams` does, collapsing repeated keys into lists.
pub fn parse_params(query: &str) -> Params {
  let query = query.strip_prefix('?').unwrap_or(query);
  let mut params = Params::new();
  for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
    match params.entry(key.into_owned()) {
      Entry::Vacant(slot) => {
        slot.insert(ParamValue::One(value.into_owned()));
      }
      Entry::Occupied(mut slot) => slot.get_mut().push(value.into_owned()),
    }
  }
  params
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_root() {
    assert_eq!(normalize_pathname("/"), "/");
    assert_eq!(normalize_pathname(""), "/");
  }

  #[test]
  fn normalize_strips_trailing_slash() {
    assert_eq!(normalize_pathname("/foo/"), "/foo");
    assert_eq!(normalize_pathname("/blog/post-1/"), "/blog/post-1");
    assert_eq!(normalize_pathname("/foo"), "/foo");
  }

  #[test]
  fn normalize_is_idempotent() {
    for p in ["/", "", "/foo/", "/foo//", "//", "/a/b/c", "a/b/", "/index"] {
      let once = normalize_pathname(p);
      assert_eq!(normalize_pathname(&once), once, "input {p:?}");
    }
  }

  #[test]
  fn params_scalar_and_repeated() {
    let params = parse_params("?tag=a&tag=b&page=2");
    assert_eq!(params["page"], ParamValue::One("2".into()));
    assert_eq!(params["tag"], ParamValue::Many(vec!["a".into(), "b".into()]));
  }

  #[test]
  fn params_decode_like_url_search_params() {
    let params = parse_params("q=hello+world&name=%C3%A9t%C3%A9&flag");
    assert_eq!(params["q"].first(), "hello world");
    assert_eq!(params["name"].first(), "été");
    assert_eq!(params["flag"].first(), "");
  }

  #[test]
  fn params_empty_query() {
    assert!(parse_params("").is_empty());
    assert!(parse_params("?").is_empty());
  }

  #[test]
  fn params_serialize_flat() {
    let params = parse_params("a=1&b=2&b=3");
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json, serde_json::json!({"a": "1", "b": ["2", "3"]}));
  }
}
