use hoistpack_common::{
  Bundle, BundleSpecifier, ModuleId,
  synthetic_names::{REQUIRE_PLACEHOLDER, REQUIRE_RESOLVE_PLACEHOLDER, exports_name},
};
use hoistpack_ecmascript_utils::ExpressionExt;
use hoistpack_error::ConcatDiagnostic;
use oxc::{
  ast::ast::{self, Expression},
  span::{SPAN, Span},
};

use super::ScopeHoistingFinalizer;

impl<'ast> ScopeHoistingFinalizer<'_, 'ast> {
  /// `__require__(id, 'source')` and `__requireResolve__(id, 'source')`.
  pub fn try_rewrite_placeholder_call(
    &mut self,
    call: &ast::CallExpression<'ast>,
  ) -> Option<Expression<'ast>> {
    let callee = match call.callee.as_identifier()?.name.as_str() {
      REQUIRE_PLACEHOLDER => REQUIRE_PLACEHOLDER,
      REQUIRE_RESOLVE_PLACEHOLDER => REQUIRE_RESOLVE_PLACEHOLDER,
      _ => return None,
    };

    let Some((importer, specifier)) = placeholder_arguments(call) else {
      self.abort(ConcatDiagnostic::InvalidPlaceholderSignature { callee });
      return None;
    };

    let target = match self.dependency_target(importer, specifier) {
      Ok(Some(target)) => target,
      Ok(None) => return Some(self.missing_module_stub(importer, specifier, call.span)),
      Err(diagnostic) => {
        self.abort(diagnostic);
        return None;
      }
    };

    if callee == REQUIRE_PLACEHOLDER {
      let exports = self.ledger.resolve(&exports_name(target));
      tracing::trace!(importer = %importer, specifier, %exports, "Rewrote require placeholder");
      Some(self.snippet.id_ref_expr(&exports, call.span))
    } else {
      let is_dynamic_import = self
        .ctx
        .graph
        .dependency(importer, specifier)
        .is_some_and(|dependency| dependency.is_dynamic_import);
      Some(self.resolved_bundles_expr(target, is_dynamic_import, call.span))
    }
  }

  /// The module id, or `[ownerBundle, ...siblingBundles, id]` when `target` is loaded lazily
  /// from a child bundle.
  fn resolved_bundles_expr(
    &self,
    target: ModuleId,
    is_dynamic_import: bool,
    span: Span,
  ) -> Expression<'ast> {
    let graph = self.ctx.graph;
    let owner =
      graph.module(target).and_then(|module| module.bundle).and_then(|idx| graph.bundle(idx));
    let target_expr = self.snippet.number_expr(f64::from(target.raw()));

    match owner {
      Some(owner)
        if is_dynamic_import && !owner.is_empty && self.ctx.bundle.child_bundles.contains(&owner.idx) =>
      {
        let siblings = owner
          .sibling_bundles
          .iter()
          .filter_map(|idx| graph.bundle(*idx))
          .filter(|sibling| !sibling.is_empty)
          .map(|sibling| self.bundle_specifier_expr(sibling));
        let elements = std::iter::once(self.bundle_specifier_expr(owner))
          .chain(siblings)
          .chain(std::iter::once(target_expr))
          .collect::<Vec<_>>();
        self.snippet.array_expr(elements, span)
      }
      _ => target_expr,
    }
  }

  fn bundle_specifier_expr(&self, bundle: &Bundle) -> Expression<'ast> {
    match bundle.specifier_from(self.ctx.bundle) {
      BundleSpecifier::Path(path) => self.snippet.string_literal_expr(&path, SPAN),
      BundleSpecifier::PathWithEntry(path, entry) => self.snippet.array_expr(
        [
          self.snippet.string_literal_expr(&path, SPAN),
          self.snippet.number_expr(f64::from(entry.raw())),
        ],
        SPAN,
      ),
    }
  }
}

/// `(number, string)`, where the number is a valid module id.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn placeholder_arguments<'a>(call: &'a ast::CallExpression) -> Option<(ModuleId, &'a str)> {
  let [id, source] = call.arguments.as_slice() else {
    return None;
  };
  let id = id.as_expression()?.as_numeric_literal()?.value;
  let source = source.as_expression()?.as_string_literal()?;
  if id.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&id) {
    return None;
  }
  Some((ModuleId::new(id as u32), source.value.as_str()))
}
