use hoistpack_common::{Bundle, ModuleGraph, ModuleId, NamedImport, NormalizedConcatOptions};
use oxc::semantic::Scoping;
use rustc_hash::FxHashMap;

pub struct ScopeHoistingFinalizerContext<'me> {
  pub graph: &'me ModuleGraph,
  pub bundle: &'me Bundle,
  pub options: &'me NormalizedConcatOptions,
  /// Facts about the merged program as it was parsed, before any rewriting.
  pub scoping: &'me Scoping,
  /// Import binding name in the merged program -> importing module and what it imports.
  pub imports: FxHashMap<&'me str, (ModuleId, &'me NamedImport)>,
}

impl<'me> ScopeHoistingFinalizerContext<'me> {
  pub fn new(
    graph: &'me ModuleGraph,
    bundle: &'me Bundle,
    options: &'me NormalizedConcatOptions,
    scoping: &'me Scoping,
  ) -> Self {
    let imports = bundle
      .modules
      .iter()
      .filter_map(|id| graph.module(*id))
      .flat_map(|module| {
        module.imports.iter().map(|(local, import)| (local.as_str(), (module.id, import)))
      })
      .collect();
    Self { graph, bundle, options, scoping, imports }
  }
}
