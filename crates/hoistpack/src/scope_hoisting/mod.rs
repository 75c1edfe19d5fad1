mod collapse;
mod finalizer_context;
mod impl_visit_mut;
mod placeholder_calls;
mod references;
mod remove_empty_declarations;

use hoistpack_common::{
  ExportsKind, ModuleId,
  synthetic_names::{
    INTEROP_DEFAULT_HELPER, MISSING_MODULE_HELPER, exports_name, interop_default_name,
  },
};
use hoistpack_ecmascript_utils::AstSnippet;
use hoistpack_error::ConcatDiagnostic;
use hoistpack_utils::{path_ext::PathExt, rstr::Rstr};
use oxc::{
  allocator::Allocator,
  ast::ast::{self, Expression},
  ast_visit::VisitMut,
  semantic::SymbolId,
  span::{SPAN, Span},
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{ExportResolver, InteropCache, ReplacementLedger};

pub use finalizer_context::ScopeHoistingFinalizerContext;
use remove_empty_declarations::RemoveEmptyDeclarations;

/// A program is swept again when a binding collapses after some of its references were
/// already visited. Each extra sweep needs such a late collapse, so this is rarely reached.
const MAX_SWEEPS: usize = 8;

/// Rewrites the merged program of one bundle so that cross-module references become direct
/// identifiers.
///
/// Owns all state of one run: the replacement ledger, the interop cache and the names it
/// synthesized. Nothing survives the run.
pub struct ScopeHoistingFinalizer<'me, 'ast> {
  pub ctx: ScopeHoistingFinalizerContext<'me>,
  pub snippet: AstSnippet<'ast>,
  pub resolver: ExportResolver<'me>,
  pub ledger: ReplacementLedger,
  pub interop_cache: InteropCache,
  /// Program-level bindings declared by this pass.
  pub synthesized: FxHashSet<Rstr>,
  /// Local bindings collapsed into a canonical name.
  pub collapsed_symbols: FxHashMap<SymbolId, Rstr>,
  /// Symbols that had at least one reference visited.
  pub visited_symbols: FxHashSet<SymbolId>,
  /// Statements to insert before the program-level statement being visited, paired with the
  /// export record they read. A record declared further down moves them after its declaration.
  pub pending_top_level_stmts: Vec<(Rstr, ast::Statement<'ast>)>,
  pub needs_another_sweep: bool,
  /// The first fatal condition. Once set, the traversal stops rewriting.
  pub diagnostic: Option<ConcatDiagnostic>,
}

impl<'me, 'ast> ScopeHoistingFinalizer<'me, 'ast> {
  pub fn new(ctx: ScopeHoistingFinalizerContext<'me>, allocator: &'ast Allocator) -> Self {
    let resolver = ExportResolver::new(ctx.graph, ctx.bundle);
    Self {
      ctx,
      snippet: AstSnippet::new(allocator),
      resolver,
      ledger: ReplacementLedger::default(),
      interop_cache: InteropCache::default(),
      synthesized: FxHashSet::default(),
      collapsed_symbols: FxHashMap::default(),
      visited_symbols: FxHashSet::default(),
      pending_top_level_stmts: Vec::new(),
      needs_another_sweep: false,
      diagnostic: None,
    }
  }

  /// Runs the traversal to a fixpoint. On error the program is left half rewritten and must be
  /// discarded.
  pub fn finalize(&mut self, program: &mut ast::Program<'ast>) -> Result<(), ConcatDiagnostic> {
    for sweep in 1..=MAX_SWEEPS {
      self.needs_another_sweep = false;
      self.visit_program(program);
      if let Some(diagnostic) = self.diagnostic.take() {
        return Err(diagnostic);
      }
      if !self.needs_another_sweep {
        break;
      }
      if sweep == MAX_SWEEPS {
        tracing::warn!("Some references may still point to collapsed bindings after {sweep} sweeps");
      } else {
        tracing::debug!(sweep, "Sweeping again for references visited before their binding collapsed");
      }
    }

    RemoveEmptyDeclarations { builder: self.snippet.builder }.visit_program(program);
    tracing::debug!(
      collapsed = self.ledger.len(),
      interop_bindings = self.interop_cache.len(),
      "Finished rewriting references"
    );
    Ok(())
  }

  #[inline]
  pub fn is_aborted(&self) -> bool {
    self.diagnostic.is_some()
  }

  /// Records a fatal condition. Only the first one is reported.
  pub fn abort(&mut self, diagnostic: ConcatDiagnostic) {
    if self.diagnostic.is_none() {
      self.diagnostic = Some(diagnostic);
    }
  }

  /// The symbol an identifier referred to in the original program, if it was bound.
  pub fn symbol_of(&self, ident: &ast::IdentifierReference) -> Option<SymbolId> {
    let reference_id = ident.reference_id.get()?;
    self.ctx.scoping.get_reference(reference_id).symbol_id()
  }

  /// Whether `name` is declared at program level, either originally or by this pass.
  pub fn is_bound(&self, name: &str) -> bool {
    self.synthesized.contains(name) || self.ctx.scoping.get_root_binding(name).is_some()
  }

  /// `name` after replacements, if that name is actually bound in the program.
  pub fn find_binding(&self, name: &str) -> Option<Rstr> {
    let name = self.ledger.resolve(name);
    self.is_bound(&name).then_some(name)
  }

  /// What `importer` gets for `specifier`: `Ok(None)` means the dependency is optional and
  /// absent from the build.
  pub fn dependency_target(
    &self,
    importer: ModuleId,
    specifier: &str,
  ) -> Result<Option<ModuleId>, ConcatDiagnostic> {
    let module = self
      .ctx
      .graph
      .module(importer)
      .ok_or(ConcatDiagnostic::UnknownModule { id: importer.raw() })?;
    match module.dependency(specifier) {
      Some(dependency) if dependency.resolved.is_some() => Ok(dependency.resolved),
      Some(dependency) if dependency.is_optional => Ok(None),
      _ => Err(ConcatDiagnostic::MissingModule {
        specifier: specifier.to_string(),
        importer: importer.raw(),
      }),
    }
  }

  /// `$hoistpack$missingModule("specifier")`
  pub fn missing_module_stub(
    &self,
    importer: ModuleId,
    specifier: &str,
    span: Span,
  ) -> Expression<'ast> {
    tracing::warn!(
      importer = %importer,
      specifier,
      "Optional dependency is not part of the build, it will throw when reached"
    );
    self.snippet.call_expr_with_arg_expr_expr(
      MISSING_MODULE_HELPER,
      self.snippet.string_literal_expr(specifier, SPAN),
      span,
    )
  }

  /// The expression a use of `name` imported from `target` turns into. `None` leaves the
  /// reference untouched.
  pub fn finalized_expr_for_import(
    &mut self,
    target: ModuleId,
    name: &str,
    span: Span,
  ) -> Option<Expression<'ast>> {
    if let Some(canonical) = self
      .resolver
      .resolve(&self.ledger, target, name)
      .and_then(|canonical| self.find_binding(&canonical))
    {
      return Some(self.snippet.id_ref_expr(&canonical, span));
    }

    if !self.ctx.bundle.contains(target) {
      // Lives in another bundle, only reachable through the runtime.
      return Some(self.snippet.require_by_id_prop_expr(target.raw(), name, span));
    }

    let graph = self.ctx.graph;
    let Some(module) = graph.module(target) else {
      self.abort(ConcatDiagnostic::UnknownModule { id: target.raw() });
      return None;
    };

    match module.exports_kind {
      ExportsKind::Esm => {
        self.abort(ConcatDiagnostic::MissingExport {
          path: module.path().relative_slash(&self.ctx.options.root_dir),
          name: name.to_string(),
        });
        None
      }
      ExportsKind::CommonJs => {
        let Some(exports) = self.find_binding(&exports_name(target)) else {
          tracing::warn!(
            module = %module.path().display(),
            name,
            "CommonJS module has no export record in this bundle, leaving the reference as is"
          );
          return None;
        };
        if name == "default" {
          let binding = self.interop_default_binding(target, &exports);
          Some(self.snippet.literal_prop_access_member_expr_expr(&binding, "d", span))
        } else {
          let record = self.snippet.id_ref_expr(&exports, SPAN);
          Some(self.snippet.member_access_expr(record, name, span))
        }
      }
    }
  }

  /// The single `$<id>$interop$default` binding of a CommonJS export record, declared before
  /// the program-level statement currently being visited the first time it is needed.
  fn interop_default_binding(&mut self, target: ModuleId, exports: &Rstr) -> Rstr {
    let (binding, created) =
      self.interop_cache.get_or_insert_with(exports, || interop_default_name(target).into());
    if created {
      let init = self.snippet.call_expr_with_arg_expr_expr(
        INTEROP_DEFAULT_HELPER,
        self.snippet.id_ref_expr(exports, SPAN),
        SPAN,
      );
      let decl = self.snippet.var_decl_stmt(&binding, init, SPAN);
      self.pending_top_level_stmts.push((exports.clone(), decl));
      self.synthesized.insert(binding.clone());
      tracing::debug!(%binding, %exports, "Synthesized default interop binding");
    }
    binding
  }
}
