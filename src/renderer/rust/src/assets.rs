/* src/renderer/rust/src/assets.rs */

use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalFile {
  /// URL the module server serves the file under, e.g. `/global/site.css`.
  pub url: String,
  pub code: String,
}

/// Site-wide CSS and JS from the global dir, sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalAssets {
  pub css: Vec<GlobalFile>,
  pub js: Vec<GlobalFile>,
}

impl GlobalAssets {
  /// Read `*.css` and `*.js` directly inside `dir`. A missing dir yields no assets.
  pub fn load(dir: &Path, url_prefix: &str) -> io::Result<Self> {
    let mut assets = Self::default();
    if !dir.is_dir() {
      return Ok(assets);
    }

    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
      let entry = entry?;
      if entry.file_type()?.is_file() {
        names.extend(entry.file_name().into_string().ok());
      }
    }
    names.sort();

    let prefix = url_prefix.trim_matches('/');
    for name in names {
      let target = match Path::new(&name).extension().and_then(|e| e.to_str()) {
        Some("css") => &mut assets.css,
        Some("js") => &mut assets.js,
        _ => continue,
      };
      let code = std::fs::read_to_string(dir.join(&name))?;
      target.push(GlobalFile { url: format!("/{prefix}/{name}"), code });
    }
    Ok(assets)
  }

  pub fn css_codes(&self) -> impl Iterator<Item = &str> {
    self.css.iter().map(|f| f.code.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_sorted_css_and_js() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("b.css"), "b{}").unwrap();
    std::fs::write(tmp.path().join("a.css"), "a{}").unwrap();
    std::fs::write(tmp.path().join("track.js"), "1;").unwrap();
    std::fs::write(tmp.path().join("notes.md"), "#").unwrap();
    std::fs::create_dir(tmp.path().join("nested.css")).unwrap();

    let assets = GlobalAssets::load(tmp.path(), "global").unwrap();
    let urls: Vec<&str> = assets.css.iter().map(|f| f.url.as_str()).collect();
    assert_eq!(urls, vec!["/global/a.css", "/global/b.css"]);
    assert_eq!(assets.js.len(), 1);
    assert_eq!(assets.js[0].code, "1;");
  }

  #[test]
  fn missing_dir_is_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = GlobalAssets::load(&tmp.path().join("nope"), "/global/").unwrap();
    assert_eq!(assets, GlobalAssets::default());
  }
}
