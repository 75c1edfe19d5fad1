use std::fmt::Display;

/// The unique integer identifier of a module across the whole build.
///
/// Every synthetic name (`$<id>$exports`, `$<id>$export$<name>`, ...) is prefixed with it, so
/// two modules can never produce colliding names as long as ids are unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
  pub const fn new(value: u32) -> Self {
    Self(value)
  }

  pub const fn raw(self) -> u32 {
    self.0
  }
}

impl Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl From<u32> for ModuleId {
  fn from(value: u32) -> Self {
    Self(value)
  }
}
