/* src/site/rust/src/test_support.rs */

use tempfile::TempDir;

pub(crate) fn exts() -> Vec<String> {
  vec!["svelte".into(), "svx".into()]
}

/// A routes tree with one placeholder file per relative path.
pub(crate) fn site(files: &[&str]) -> TempDir {
  let tmp = TempDir::new().unwrap();
  for file in files {
    let path = tmp.path().join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, format!("<!-- {file} -->")).unwrap();
  }
  tmp
}
