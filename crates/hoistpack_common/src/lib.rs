mod bundle;
mod concat_options;
mod manifest;
mod module;
mod module_graph;
mod types;

pub mod synthetic_names;

pub use crate::{
  bundle::{Bundle, BundleSpecifier},
  concat_options::{ConcatOptions, normalized_concat_options::NormalizedConcatOptions},
  manifest::{Manifest, ManifestBundle, ManifestDependency, ManifestExport, ManifestModule},
  module::Module,
  module_graph::ModuleGraph,
  types::{
    dependency::Dependency, export_entry::ExportEntry, exports_kind::ExportsKind,
    module_id::ModuleId, named_import::NamedImport, raw_idx::BundleIdx,
  },
};
