mod concatenator;
mod export_resolver;
mod post_pass;
mod scope_hoisting;
mod types;
mod utils;

#[cfg(test)]
mod tests;

pub use crate::{
  concatenator::Concatenator,
  export_resolver::ExportResolver,
  post_pass::{
    DeadCodeEliminator, OxcDeadCodeEliminator, OxcScopeMangler, ScopeMangler,
    remove_unused_synthetic_bindings,
  },
  types::{
    SharedOptions, concat_output::ConcatOutput, interop_cache::InteropCache,
    replacement_ledger::ReplacementLedger,
  },
  utils::normalize_options::normalize_options,
};
pub use hoistpack_common::*;
pub use hoistpack_error::{BuildError, BuildResult, ConcatDiagnostic};
