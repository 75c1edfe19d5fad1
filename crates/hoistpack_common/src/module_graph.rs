use std::collections::hash_map::Entry;

use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{Bundle, BundleIdx, Dependency, Module, ModuleId};

/// Read-only view over every module and bundle of a build.
///
/// It must not change while a concatenation run is in progress. Runs on different bundles may
/// share it across threads.
#[derive(Debug, Default)]
pub struct ModuleGraph {
  pub modules: FxHashMap<ModuleId, Module>,
  pub bundles: IndexVec<BundleIdx, Bundle>,
}

impl ModuleGraph {
  pub fn add_module(&mut self, module: Module) -> &mut Module {
    match self.modules.entry(module.id) {
      Entry::Occupied(mut entry) => {
        entry.insert(module);
        entry.into_mut()
      }
      Entry::Vacant(entry) => entry.insert(module),
    }
  }

  /// Creates an empty bundle and returns its index.
  pub fn add_bundle(&mut self, name: &str) -> BundleIdx {
    let idx = self.bundles.next_idx();
    self.bundles.push(Bundle::new(idx, name))
  }

  /// Places `module` into `bundle`. The first bundle a module is placed in is its owner.
  pub fn place_module(&mut self, module: ModuleId, bundle: BundleIdx) {
    self.bundles[bundle].modules.insert(module);
    if let Some(module) = self.modules.get_mut(&module) {
      module.bundle.get_or_insert(bundle);
    }
  }

  #[inline]
  pub fn module(&self, id: ModuleId) -> Option<&Module> {
    self.modules.get(&id)
  }

  pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
    self.modules.get_mut(&id)
  }

  #[inline]
  pub fn bundle(&self, idx: BundleIdx) -> Option<&Bundle> {
    self.bundles.get(idx)
  }

  pub fn dependency(&self, importer: ModuleId, specifier: &str) -> Option<&Dependency> {
    self.module(importer)?.dependency(specifier)
  }

  /// The module `specifier` points to when written in `importer`. A pure lookup.
  pub fn resolve_dependency(&self, importer: ModuleId, specifier: &str) -> Option<&Module> {
    self.module(self.dependency(importer, specifier)?.resolved?)
  }
}

#[test]
fn test_resolve_dependency() {
  let mut graph = ModuleGraph::default();
  graph.add_module(Module::new(0, "a.js")).add_dependency(Dependency::new("./b", Some(1.into())));
  graph.add_module(Module::new(1, "b.js"));
  graph.module_mut(0.into()).unwrap().add_dependency(Dependency::new("./missing", None));

  assert_eq!(graph.resolve_dependency(0.into(), "./b").map(|m| m.id), Some(ModuleId::new(1)));
  assert!(graph.resolve_dependency(0.into(), "./missing").is_none());
  assert!(graph.resolve_dependency(0.into(), "./undeclared").is_none());
  assert!(graph.resolve_dependency(5.into(), "./b").is_none());
}

#[test]
fn test_place_module_keeps_first_owner() {
  let mut graph = ModuleGraph::default();
  graph.add_module(Module::new(3, "c.js"));
  let main = graph.add_bundle("main.js");
  let other = graph.add_bundle("other.js");
  graph.place_module(3.into(), main);
  graph.place_module(3.into(), other);
  assert_eq!(graph.module(3.into()).unwrap().bundle, Some(main));
  assert!(graph.bundle(other).unwrap().contains(3.into()));
}
