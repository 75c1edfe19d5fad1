use std::{borrow::Borrow, fmt, ops::Deref};

use arcstr::ArcStr;

/// Cheaply clonable, immutable string shared between module metadata, the replacement ledger
/// and the interop cache.
#[derive(Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(transparent)]
pub struct Rstr(ArcStr);

impl Rstr {
  pub fn new(value: &str) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }
}

impl Deref for Rstr {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    self.0.as_str()
  }
}

impl AsRef<str> for Rstr {
  fn as_ref(&self) -> &str {
    self.0.as_str()
  }
}

impl Borrow<str> for Rstr {
  fn borrow(&self) -> &str {
    self.0.as_str()
  }
}

impl fmt::Debug for Rstr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self.0.as_str(), f)
  }
}

impl fmt::Display for Rstr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self.0.as_str(), f)
  }
}

impl From<&str> for Rstr {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Rstr {
  fn from(value: String) -> Self {
    Self(value.into())
  }
}

impl From<ArcStr> for Rstr {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}

impl PartialEq<str> for Rstr {
  fn eq(&self, other: &str) -> bool {
    self.as_str() == other
  }
}

impl PartialEq<&str> for Rstr {
  fn eq(&self, other: &&str) -> bool {
    self.as_str() == *other
  }
}

#[test]
fn test_rstr_lookup_by_str() {
  let mut map = rustc_hash::FxHashMap::default();
  map.insert(Rstr::new("$1$exports"), 1);
  assert_eq!(map.get("$1$exports"), Some(&1));
  assert_eq!(Rstr::from("default"), "default");
}
