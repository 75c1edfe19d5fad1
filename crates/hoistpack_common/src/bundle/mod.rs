use std::path::Path;

use hoistpack_utils::{indexmap::FxIndexSet, path_ext::PathExt, rstr::Rstr};

use crate::{BundleIdx, ModuleId};

#[derive(Debug)]
pub struct Bundle {
  pub idx: BundleIdx,
  /// Output path of the bundle.
  pub name: Rstr,
  pub is_empty: bool,
  pub entry_module: Option<ModuleId>,
  pub modules: FxIndexSet<ModuleId>,
  /// Bundles loaded lazily from this one.
  pub child_bundles: FxIndexSet<BundleIdx>,
  /// Bundles that must be loaded alongside this one, e.g. its stylesheet.
  pub sibling_bundles: FxIndexSet<BundleIdx>,
}

/// How a bundle is referred to from the code of another bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSpecifier {
  Path(String),
  /// The bundle has an entry module that must be required once it is loaded.
  PathWithEntry(String, ModuleId),
}

impl Bundle {
  pub fn new(idx: BundleIdx, name: impl Into<Rstr>) -> Self {
    Self {
      idx,
      name: name.into(),
      is_empty: false,
      entry_module: None,
      modules: FxIndexSet::default(),
      child_bundles: FxIndexSet::default(),
      sibling_bundles: FxIndexSet::default(),
    }
  }

  #[inline]
  pub fn contains(&self, module: ModuleId) -> bool {
    self.modules.contains(&module)
  }

  /// The specifier of `self` as seen from code living in `importer`.
  pub fn specifier_from(&self, importer: &Bundle) -> BundleSpecifier {
    let path = Path::new(self.name.as_str()).relative_slash_from_file(Path::new(importer.name.as_str()));
    match self.entry_module {
      Some(entry) => BundleSpecifier::PathWithEntry(path, entry),
      None => BundleSpecifier::Path(path),
    }
  }
}

#[test]
fn test_specifier_from() {
  let main = Bundle::new(BundleIdx::new(0), "/out/main.js");
  let mut lazy = Bundle::new(BundleIdx::new(1), "/out/chunks/lazy.js");
  assert_eq!(lazy.specifier_from(&main), BundleSpecifier::Path("chunks/lazy.js".to_string()));
  lazy.entry_module = Some(ModuleId::new(7));
  assert_eq!(
    lazy.specifier_from(&main),
    BundleSpecifier::PathWithEntry("chunks/lazy.js".to_string(), ModuleId::new(7))
  );
}
