use anyhow::Context;
use hoistpack_utils::{indexmap::FxIndexMap, rstr::Rstr};

use crate::{
  BundleIdx, ConcatOptions, Dependency, ExportEntry, ExportsKind, Module, ModuleGraph, ModuleId,
  NamedImport,
};

/// JSON description of a build: the options plus every bundle and module the concatenation
/// pass may look at.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
  #[serde(default)]
  pub options: ConcatOptions,
  #[serde(default)]
  pub bundles: Vec<ManifestBundle>,
  #[serde(default)]
  pub modules: Vec<ManifestModule>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBundle {
  pub name: Rstr,
  #[serde(default)]
  pub is_empty: bool,
  #[serde(default)]
  pub entry_module: Option<ModuleId>,
  #[serde(default)]
  pub modules: Vec<ModuleId>,
  #[serde(default)]
  pub child_bundles: Vec<usize>,
  #[serde(default)]
  pub sibling_bundles: Vec<usize>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestModule {
  pub id: ModuleId,
  pub name: String,
  #[serde(default)]
  pub is_dynamic_export: bool,
  #[serde(default)]
  pub exports: FxIndexMap<Rstr, ManifestExport>,
  #[serde(default)]
  pub wildcards: Vec<Rstr>,
  #[serde(default)]
  pub dependencies: FxIndexMap<Rstr, ManifestDependency>,
  /// Local name -> `[source, imported]`
  #[serde(default)]
  pub imports: FxIndexMap<Rstr, (Rstr, Rstr)>,
}

/// Either `"localName"` or `["source", "importedName"]`.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ManifestExport {
  Local(Rstr),
  ReExport(Rstr, Rstr),
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDependency {
  #[serde(default)]
  pub optional: bool,
  #[serde(default)]
  pub dynamic: bool,
  #[serde(default)]
  pub resolved: Option<ModuleId>,
}

impl Manifest {
  pub fn from_json(json: &str) -> anyhow::Result<Self> {
    serde_json::from_str(json).context("Failed to parse manifest")
  }

  pub fn into_graph(self) -> anyhow::Result<(ModuleGraph, ConcatOptions)> {
    let mut graph = ModuleGraph::default();

    for module in self.modules {
      graph.add_module(module.into_module());
    }

    let bundle_count = self.bundles.len();
    let to_idx = |raw: usize| -> anyhow::Result<BundleIdx> {
      anyhow::ensure!(raw < bundle_count, "Bundle index {raw} is out of range");
      Ok(BundleIdx::from_usize(raw))
    };

    for bundle in &self.bundles {
      let idx = graph.add_bundle(&bundle.name);
      graph.bundles[idx].is_empty = bundle.is_empty;
      graph.bundles[idx].entry_module = bundle.entry_module;
    }

    for (raw, bundle) in self.bundles.into_iter().enumerate() {
      let idx = BundleIdx::from_usize(raw);
      for module in bundle.modules {
        anyhow::ensure!(
          graph.module(module).is_some(),
          "Bundle {} lists module {module} which is not declared",
          bundle.name
        );
        graph.place_module(module, idx);
      }
      for child in bundle.child_bundles {
        let child = to_idx(child)?;
        graph.bundles[idx].child_bundles.insert(child);
      }
      for sibling in bundle.sibling_bundles {
        let sibling = to_idx(sibling)?;
        graph.bundles[idx].sibling_bundles.insert(sibling);
      }
    }

    Ok((graph, self.options))
  }
}

impl ManifestModule {
  fn into_module(self) -> Module {
    let mut module = Module::new(self.id, self.name);
    module.exports_kind =
      if self.is_dynamic_export { ExportsKind::CommonJs } else { ExportsKind::Esm };
    module.exports = self
      .exports
      .into_iter()
      .map(|(name, export)| {
        let entry = match export {
          ManifestExport::Local(local) => ExportEntry::Local(local),
          ManifestExport::ReExport(source, imported) => ExportEntry::ReExport { source, imported },
        };
        (name, entry)
      })
      .collect();
    module.wildcard_sources = self.wildcards;
    module.dependencies = self
      .dependencies
      .into_iter()
      .map(|(specifier, dep)| {
        let dependency = Dependency {
          specifier: specifier.clone(),
          is_optional: dep.optional,
          is_dynamic_import: dep.dynamic,
          resolved: dep.resolved,
        };
        (specifier, dependency)
      })
      .collect();
    module.imports = self
      .imports
      .into_iter()
      .map(|(local, (source, imported))| (local, NamedImport { source, imported }))
      .collect();
    module
  }
}

#[test]
fn test_manifest_into_graph() {
  let json = r#"{
    "options": { "minify": true },
    "bundles": [
      { "name": "dist/main.js", "modules": [0, 1], "childBundles": [1] },
      { "name": "dist/lazy.js", "modules": [2], "entryModule": 2 }
    ],
    "modules": [
      { "id": 0, "name": "src/a.js", "exports": { "x": "$0$export$x", "y": ["./b", "z"] },
        "dependencies": { "./b": { "resolved": 1 } } },
      { "id": 1, "name": "src/b.js", "isDynamicExport": true,
        "dependencies": { "./lazy": { "resolved": 2, "dynamic": true }, "fs": { "optional": true } } },
      { "id": 2, "name": "src/lazy.js", "imports": { "$2$import$x": ["./a", "x"] } }
    ]
  }"#;
  let (graph, options) = Manifest::from_json(json).unwrap().into_graph().unwrap();
  assert_eq!(options.minify, Some(true));

  let a = graph.module(ModuleId::new(0)).unwrap();
  assert_eq!(a.export("x"), Some(&ExportEntry::Local("$0$export$x".into())));
  assert_eq!(
    a.export("y"),
    Some(&ExportEntry::ReExport { source: "./b".into(), imported: "z".into() })
  );
  assert_eq!(a.bundle, Some(BundleIdx::new(0)));

  let b = graph.module(ModuleId::new(1)).unwrap();
  assert_eq!(b.exports_kind, ExportsKind::CommonJs);
  assert!(b.dependency("fs").unwrap().is_optional);
  assert!(b.dependency("./lazy").unwrap().is_dynamic_import);

  let main = graph.bundle(BundleIdx::new(0)).unwrap();
  assert!(main.child_bundles.contains(&BundleIdx::new(1)));
  assert_eq!(graph.bundle(BundleIdx::new(1)).unwrap().entry_module, Some(ModuleId::new(2)));
}

#[test]
fn test_manifest_rejects_unknown_bundle_index() {
  let json = r#"{ "bundles": [ { "name": "main.js", "childBundles": [4] } ] }"#;
  assert!(Manifest::from_json(json).unwrap().into_graph().is_err());
}
