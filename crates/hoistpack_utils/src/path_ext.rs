use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  /// `self` relative to `base`, with `/` separators on every platform.
  fn relative_slash(&self, base: &Path) -> String;

  /// Like [PathExt::relative_slash], but against the directory containing `file`.
  fn relative_slash_from_file(&self, file: &Path) -> String;
}

impl PathExt for Path {
  fn relative_slash(&self, base: &Path) -> String {
    if self.is_absolute() == base.is_absolute() {
      self.relative(base).to_slash_lossy().into_owned()
    } else {
      self.to_slash_lossy().into_owned()
    }
  }

  fn relative_slash_from_file(&self, file: &Path) -> String {
    let dir = file.parent().unwrap_or_else(|| Path::new(""));
    self.relative_slash(dir)
  }
}

#[test]
fn test_relative_slash() {
  let root = Path::new("/project");
  assert_eq!(Path::new("/project/src/a.js").relative_slash(root), "src/a.js");
  assert_eq!(Path::new("/project/dist/b.js").relative_slash_from_file(Path::new("/project/dist/a.js")), "b.js");
  assert_eq!(
    Path::new("/project/dist/lazy/c.js").relative_slash_from_file(Path::new("/project/dist/main.js")),
    "lazy/c.js"
  );
}
