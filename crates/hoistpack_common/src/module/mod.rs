use std::path::{Path, PathBuf};

use hoistpack_utils::{indexmap::FxIndexMap, rstr::Rstr};

use crate::{BundleIdx, Dependency, ExportEntry, ExportsKind, ModuleId, NamedImport};

/// Read-only metadata of one compiled module, as produced by the per-module transform.
#[derive(Debug)]
pub struct Module {
  pub id: ModuleId,
  /// Source path, only used for diagnostics.
  pub name: PathBuf,
  pub exports_kind: ExportsKind,
  /// Exported name -> local binding or re-export descriptor.
  pub exports: FxIndexMap<Rstr, ExportEntry>,
  /// Sources of `export * from '...'`, in declaration order. `default` is never propagated
  /// through them.
  pub wildcard_sources: Vec<Rstr>,
  /// Specifier -> dependency, as written in the module source.
  pub dependencies: FxIndexMap<Rstr, Dependency>,
  /// Local binding name in the merged source -> what it imports.
  pub imports: FxIndexMap<Rstr, NamedImport>,
  /// The bundle this module is emitted into.
  pub bundle: Option<BundleIdx>,
}

impl Module {
  pub fn new(id: impl Into<ModuleId>, name: impl Into<PathBuf>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      exports_kind: ExportsKind::Esm,
      exports: FxIndexMap::default(),
      wildcard_sources: Vec::new(),
      dependencies: FxIndexMap::default(),
      imports: FxIndexMap::default(),
      bundle: None,
    }
  }

  pub fn path(&self) -> &Path {
    &self.name
  }

  pub fn dependency(&self, specifier: &str) -> Option<&Dependency> {
    self.dependencies.get(specifier)
  }

  pub fn export(&self, name: &str) -> Option<&ExportEntry> {
    self.exports.get(name)
  }

  pub fn add_local_export(&mut self, exported: &str, local: &str) -> &mut Self {
    self.exports.insert(exported.into(), ExportEntry::Local(local.into()));
    self
  }

  pub fn add_re_export(&mut self, exported: &str, source: &str, imported: &str) -> &mut Self {
    self
      .exports
      .insert(exported.into(), ExportEntry::ReExport { source: source.into(), imported: imported.into() });
    self
  }

  pub fn add_wildcard_source(&mut self, source: &str) -> &mut Self {
    self.wildcard_sources.push(source.into());
    self
  }

  pub fn add_dependency(&mut self, dependency: Dependency) -> &mut Self {
    self.dependencies.insert(dependency.specifier.clone(), dependency);
    self
  }

  pub fn add_import(&mut self, local: &str, source: &str, imported: &str) -> &mut Self {
    self
      .imports
      .insert(local.into(), NamedImport { source: source.into(), imported: imported.into() });
    self
  }
}
