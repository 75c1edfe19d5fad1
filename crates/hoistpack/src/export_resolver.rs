use hoistpack_common::{
  Bundle, ExportEntry, Module, ModuleGraph, ModuleId, synthetic_names::exports_name,
};
use hoistpack_utils::rstr::Rstr;

use crate::ReplacementLedger;

/// Finds the binding that really defines an export, following re-exports and `export *`.
///
/// Only modules emitted into `bundle` have statically known bindings. Everything else resolves
/// to nothing and is left to the runtime.
pub struct ExportResolver<'a> {
  graph: &'a ModuleGraph,
  bundle: &'a Bundle,
}

enum MatchExport {
  Found(Rstr),
  NotFound,
  /// `(module, name)` is already being resolved further up the stack.
  Cycle,
}

impl<'a> ExportResolver<'a> {
  pub fn new(graph: &'a ModuleGraph, bundle: &'a Bundle) -> Self {
    Self { graph, bundle }
  }

  /// The module behind `id`, if it is part of the current bundle.
  pub fn module(&self, id: ModuleId) -> Option<&'a Module> {
    if self.bundle.contains(id) { self.graph.module(id) } else { None }
  }

  /// Canonical binding name of `name` exported by `id`, with replacements already recorded in
  /// `ledger` applied.
  ///
  /// Nothing is cached: the ledger grows while the program is rewritten, so the same query may
  /// legitimately answer differently later in a run.
  pub fn resolve(&self, ledger: &ReplacementLedger, id: ModuleId, name: &str) -> Option<Rstr> {
    let mut tracker_stack = Vec::new();
    match self.match_export(id, name, &mut tracker_stack) {
      MatchExport::Found(canonical) => {
        let canonical = ledger.resolve(&canonical);
        tracing::trace!(module = %id, name, %canonical, "Resolved export");
        Some(canonical)
      }
      MatchExport::Cycle => {
        tracing::trace!(module = %id, name, "Export resolution ran into a cycle");
        None
      }
      MatchExport::NotFound => None,
    }
  }

  fn match_export(
    &self,
    id: ModuleId,
    name: &str,
    tracker_stack: &mut Vec<(ModuleId, Rstr)>,
  ) -> MatchExport {
    let Some(module) = self.module(id) else {
      return MatchExport::NotFound;
    };
    if tracker_stack.iter().any(|(tracked, tracked_name)| *tracked == id && tracked_name == name) {
      return MatchExport::Cycle;
    }

    tracker_stack.push((id, Rstr::new(name)));
    let ret = match module.export(name) {
      Some(ExportEntry::Local(local)) => MatchExport::Found(local.clone()),
      Some(ExportEntry::ReExport { source, imported }) => {
        match self.graph.resolve_dependency(id, source) {
          Some(target) => self.match_export(target.id, imported, tracker_stack),
          None => MatchExport::NotFound,
        }
      }
      None if name == "*" => MatchExport::Found(exports_name(id).into()),
      // `default` never travels through `export *`.
      None if name != "default" => self.match_wildcard_export(module, name, tracker_stack),
      None => MatchExport::NotFound,
    };
    tracker_stack.pop();
    ret
  }

  /// The first wildcard source declaring `name` wins.
  fn match_wildcard_export(
    &self,
    module: &Module,
    name: &str,
    tracker_stack: &mut Vec<(ModuleId, Rstr)>,
  ) -> MatchExport {
    let mut ret = MatchExport::NotFound;
    for source in &module.wildcard_sources {
      let Some(target) = self.graph.resolve_dependency(module.id, source) else {
        continue;
      };
      match self.match_export(target.id, name, tracker_stack) {
        found @ MatchExport::Found(_) => return found,
        MatchExport::Cycle => ret = MatchExport::Cycle,
        MatchExport::NotFound => {}
      }
    }
    ret
  }
}

#[cfg(test)]
fn build_graph(modules: Vec<Module>) -> (ModuleGraph, hoistpack_common::BundleIdx) {
  let mut graph = ModuleGraph::default();
  let ids = modules.iter().map(|module| module.id).collect::<Vec<_>>();
  for module in modules {
    graph.add_module(module);
  }
  let bundle = graph.add_bundle("/dist/main.js");
  for id in ids {
    graph.place_module(id, bundle);
  }
  (graph, bundle)
}

#[cfg(test)]
fn module_with_deps(id: u32, deps: &[(&str, u32)]) -> Module {
  let mut module = Module::new(id, format!("/project/src/m{id}.js"));
  for (specifier, target) in deps {
    module.add_dependency(hoistpack_common::Dependency::new(*specifier, Some((*target).into())));
  }
  module
}

#[test]
fn test_re_export_chain() {
  let mut a = module_with_deps(0, &[("./b", 1)]);
  a.add_re_export("x", "./b", "x");
  let mut b = module_with_deps(1, &[("./c", 2)]);
  b.add_re_export("x", "./c", "y");
  let mut c = module_with_deps(2, &[]);
  c.add_local_export("y", "$2$export$y");

  let (graph, bundle) = build_graph(vec![a, b, c]);
  let resolver = ExportResolver::new(&graph, &graph.bundles[bundle]);
  let ledger = ReplacementLedger::default();
  assert_eq!(resolver.resolve(&ledger, 0.into(), "x").as_deref(), Some("$2$export$y"));
  // Same answer without intervening ledger changes.
  assert_eq!(resolver.resolve(&ledger, 0.into(), "x").as_deref(), Some("$2$export$y"));
  assert_eq!(resolver.resolve(&ledger, 0.into(), "missing"), None);
}

#[test]
fn test_wildcard_precedence_and_default_exclusion() {
  let mut a = module_with_deps(0, &[("./b", 1), ("./c", 2)]);
  a.add_wildcard_source("./b").add_wildcard_source("./c");
  let mut b = module_with_deps(1, &[]);
  b.add_local_export("y", "$1$export$y").add_local_export("default", "$1$export$default");
  let mut c = module_with_deps(2, &[]);
  c.add_local_export("y", "$2$export$y").add_local_export("z", "$2$export$z");

  let (graph, bundle) = build_graph(vec![a, b, c]);
  let resolver = ExportResolver::new(&graph, &graph.bundles[bundle]);
  let ledger = ReplacementLedger::default();
  assert_eq!(resolver.resolve(&ledger, 0.into(), "y").as_deref(), Some("$1$export$y"));
  assert_eq!(resolver.resolve(&ledger, 0.into(), "z").as_deref(), Some("$2$export$z"));
  assert_eq!(resolver.resolve(&ledger, 0.into(), "default"), None);
}

#[test]
fn test_direct_export_beats_wildcard() {
  let mut a = module_with_deps(0, &[("./b", 1)]);
  a.add_wildcard_source("./b").add_local_export("y", "$0$export$y");
  let mut b = module_with_deps(1, &[]);
  b.add_local_export("y", "$1$export$y");

  let (graph, bundle) = build_graph(vec![a, b]);
  let resolver = ExportResolver::new(&graph, &graph.bundles[bundle]);
  let ledger = ReplacementLedger::default();
  assert_eq!(resolver.resolve(&ledger, 0.into(), "y").as_deref(), Some("$0$export$y"));
}

#[test]
fn test_namespace_and_ledger_substitution() {
  let mut a = module_with_deps(0, &[]);
  a.add_local_export("x", "$0$export$x");
  let (graph, bundle) = build_graph(vec![a]);
  let resolver = ExportResolver::new(&graph, &graph.bundles[bundle]);

  let mut ledger = ReplacementLedger::default();
  assert_eq!(resolver.resolve(&ledger, 0.into(), "*").as_deref(), Some("$0$exports"));
  ledger.insert("$0$export$x", "$0$inlined");
  ledger.insert("$0$inlined", "$0$inlined$again");
  assert_eq!(resolver.resolve(&ledger, 0.into(), "x").as_deref(), Some("$0$inlined$again"));
}

#[test]
fn test_cycles_resolve_to_nothing() {
  let mut a = module_with_deps(0, &[("./b", 1)]);
  a.add_re_export("x", "./b", "x").add_wildcard_source("./b");
  let mut b = module_with_deps(1, &[("./a", 0)]);
  b.add_re_export("x", "./a", "x").add_wildcard_source("./a");

  let (graph, bundle) = build_graph(vec![a, b]);
  let resolver = ExportResolver::new(&graph, &graph.bundles[bundle]);
  let ledger = ReplacementLedger::default();
  assert_eq!(resolver.resolve(&ledger, 0.into(), "x"), None);
  assert_eq!(resolver.resolve(&ledger, 0.into(), "anything"), None);
}

#[test]
fn test_modules_outside_the_bundle_are_opaque() {
  let mut a = module_with_deps(0, &[("./b", 1)]);
  a.add_re_export("x", "./b", "x");
  let mut graph = ModuleGraph::default();
  graph.add_module(a);
  graph.add_module(module_with_deps(1, &[])).add_local_export("x", "$1$export$x");
  let main = graph.add_bundle("/dist/main.js");
  let other = graph.add_bundle("/dist/other.js");
  graph.place_module(0.into(), main);
  graph.place_module(1.into(), other);

  let resolver = ExportResolver::new(&graph, &graph.bundles[main]);
  assert_eq!(resolver.resolve(&ReplacementLedger::default(), 0.into(), "x"), None);
  assert!(resolver.module(1.into()).is_none());
}
