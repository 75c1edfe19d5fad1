use std::{path::PathBuf, sync::Arc};

use arcstr::ArcStr;
use hoistpack_common::{BundleIdx, ConcatOptions, ModuleGraph, NormalizedConcatOptions};
use hoistpack_ecmascript::{EcmaCompiler, PrintOptions};
use hoistpack_error::{BuildError, BuildResult, ConcatDiagnostic};
use hoistpack_utils::rayon::{IntoParallelRefIterator, ParallelIterator};
use itertools::Itertools;
use oxc::semantic::Scoping;

use crate::{
  DeadCodeEliminator, OxcDeadCodeEliminator, OxcScopeMangler, ScopeMangler, SharedOptions,
  scope_hoisting::{ScopeHoistingFinalizer, ScopeHoistingFinalizerContext},
  types::concat_output::ConcatOutput,
  utils::{
    normalize_options::normalize_options,
    parse_to_ecma_ast::{make_ast_scoping, parse_to_ecma_ast},
  },
};

/// Merges the modules of a bundle into one flat program.
///
/// A `Concatenator` holds no per-run state: every call gets a fresh ledger and interop cache,
/// so one instance can process many bundles, concurrently if needed.
pub struct Concatenator {
  options: SharedOptions,
  dead_code_eliminator: Box<dyn DeadCodeEliminator>,
  scope_mangler: Box<dyn ScopeMangler>,
}

impl Concatenator {
  pub fn new(options: ConcatOptions) -> Self {
    Self {
      options: Arc::new(normalize_options(options)),
      dead_code_eliminator: Box::new(OxcDeadCodeEliminator),
      scope_mangler: Box::new(OxcScopeMangler),
    }
  }

  #[must_use]
  pub fn with_dead_code_eliminator(mut self, eliminator: impl DeadCodeEliminator + 'static) -> Self {
    self.dead_code_eliminator = Box::new(eliminator);
    self
  }

  #[must_use]
  pub fn with_scope_mangler(mut self, mangler: impl ScopeMangler + 'static) -> Self {
    self.scope_mangler = Box::new(mangler);
    self
  }

  pub fn options(&self) -> &NormalizedConcatOptions {
    &self.options
  }

  /// Rewrites `source`, the merged code of `bundle_idx`, and prints the result.
  ///
  /// `graph` is only read. Any fatal condition aborts the run without output.
  pub fn concat(
    &self,
    graph: &ModuleGraph,
    bundle_idx: BundleIdx,
    source: impl Into<ArcStr>,
  ) -> BuildResult<ConcatOutput> {
    let bundle = graph
      .bundle(bundle_idx)
      .ok_or_else(|| anyhow::anyhow!("Bundle {} does not exist", bundle_idx.index()))?;

    let (ast, scoping) = {
      let _span = tracing::info_span!("concat", bundle = %bundle.name).entered();
      let mut ast = parse_to_ecma_ast(bundle.name.inner(), source.into())?;
      let scoping = ast.program.with_mut(|fields| -> Result<Option<Scoping>, ConcatDiagnostic> {
        let scoping = make_ast_scoping(fields.name, fields.program)?;
        let ctx = ScopeHoistingFinalizerContext::new(graph, bundle, &self.options, &scoping);
        ScopeHoistingFinalizer::new(ctx, fields.allocator).finalize(fields.program)?;

        self.dead_code_eliminator.eliminate(fields.allocator, fields.program);
        Ok(if self.options.minify {
          self.scope_mangler.mangle(fields.allocator, fields.program)
        } else {
          None
        })
      })?;
      (ast, scoping)
    };

    let _span = tracing::info_span!("generate", bundle = %bundle.name).entered();
    let print_options = PrintOptions {
      minify: self.options.minify,
      comments: self.options.comments,
      source_map_path: self.options.source_maps.then(|| PathBuf::from(bundle.name.as_str())),
    };
    let ret = EcmaCompiler::print_with(&ast, &print_options, scoping);
    Ok(ConcatOutput { code: ret.code, map: ret.map.map(|map| map.to_json_string()) })
  }

  /// Runs [Concatenator::concat] for several bundles in parallel. Errors of all failed bundles
  /// are reported together.
  pub fn concat_bundles(
    &self,
    graph: &ModuleGraph,
    inputs: &[(BundleIdx, ArcStr)],
  ) -> BuildResult<Vec<ConcatOutput>> {
    let (outputs, errors): (Vec<_>, Vec<_>) = inputs
      .par_iter()
      .map(|(bundle_idx, source)| self.concat(graph, *bundle_idx, source.clone()))
      .collect::<Vec<_>>()
      .into_iter()
      .partition_result();

    if errors.is_empty() {
      Ok(outputs)
    } else {
      Err(BuildError(errors.into_iter().flat_map(|error: BuildError| error.0).collect()))
    }
  }
}
