use hoistpack_utils::rstr::Rstr;
use rustc_hash::{FxHashMap, FxHashSet};

/// Local binding names that were collapsed into another name during one concatenation run.
///
/// Entries form chains: `a -> b` followed later by `b -> c` means `a` now reads as `c`. Lookups
/// always follow the whole chain.
#[derive(Debug, Default)]
pub struct ReplacementLedger {
  replacements: FxHashMap<Rstr, Rstr>,
}

impl ReplacementLedger {
  pub fn insert(&mut self, local: impl Into<Rstr>, canonical: impl Into<Rstr>) {
    let local = local.into();
    let canonical = canonical.into();
    if local != canonical {
      self.replacements.insert(local, canonical);
    }
  }

  /// Follows the chain starting at `name` to its current end. A name that was never replaced
  /// resolves to itself. A chain that loops back stops at the last name before the repetition.
  pub fn resolve(&self, name: &str) -> Rstr {
    let Some(mut current) = self.replacements.get(name) else {
      return Rstr::new(name);
    };
    let mut visited = FxHashSet::default();
    visited.insert(name);
    while let Some(next) = self.replacements.get(current.as_str()) {
      if !visited.insert(current.as_str()) || visited.contains(next.as_str()) {
        break;
      }
      current = next;
    }
    current.clone()
  }

  pub fn len(&self) -> usize {
    self.replacements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.replacements.is_empty()
  }
}

#[test]
fn test_resolve_follows_chains() {
  let mut ledger = ReplacementLedger::default();
  ledger.insert("a", "$1$exports");
  ledger.insert("$1$exports", "$2$exports");
  ledger.insert("b", "$2$export$b");
  assert_eq!(ledger.resolve("a"), "$2$exports");
  assert_eq!(ledger.resolve("b"), "$2$export$b");
  assert_eq!(ledger.resolve("c"), "c");
  assert_eq!(ledger.len(), 3);
}

#[test]
fn test_resolve_stops_on_cycles() {
  let mut ledger = ReplacementLedger::default();
  ledger.insert("a", "b");
  ledger.insert("b", "c");
  ledger.insert("c", "a");
  assert_eq!(ledger.resolve("a"), "c");
  assert_eq!(ledger.resolve("b"), "a");

  ledger.insert("self", "self");
  assert_eq!(ledger.len(), 3);
  assert_eq!(ledger.resolve("self"), "self");
}
