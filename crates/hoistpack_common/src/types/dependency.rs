use hoistpack_utils::rstr::Rstr;

use crate::ModuleId;

#[derive(Debug, Clone)]
pub struct Dependency {
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: Rstr,
  /// Wrapped in `try {} catch {}` by the author, so a missing target is not a build failure.
  pub is_optional: bool,
  /// `import('./lib.js')`
  pub is_dynamic_import: bool,
  /// The target module, if the dependency graph could resolve one.
  pub resolved: Option<ModuleId>,
}

impl Dependency {
  pub fn new(specifier: impl Into<Rstr>, resolved: Option<ModuleId>) -> Self {
    Self { specifier: specifier.into(), is_optional: false, is_dynamic_import: false, resolved }
  }

  #[must_use]
  pub fn optional(mut self) -> Self {
    self.is_optional = true;
    self
  }

  #[must_use]
  pub fn dynamic(mut self) -> Self {
    self.is_dynamic_import = true;
    self
  }
}
