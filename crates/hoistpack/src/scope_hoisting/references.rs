use hoistpack_common::synthetic_names::parse_exports_name;
use hoistpack_utils::rstr::Rstr;
use oxc::{
  ast::ast::{self, Expression},
  ast_visit::walk_mut,
};

use super::ScopeHoistingFinalizer;

/// A rewritten node is matched again, e.g. `__require__(0, './a')` becomes `$0$exports`, which
/// may in turn become `{}`.
const MAX_REWRITES_PER_NODE: usize = 8;

impl<'ast> ScopeHoistingFinalizer<'_, 'ast> {
  /// Applies the rewrite rules to `expr` until none matches.
  ///
  /// With `allow_empty_record` unset, an unbound `$<id>$exports` is kept as is so the
  /// declarator it initializes can still collapse.
  pub fn rewrite_expression(&mut self, expr: &mut Expression<'ast>, allow_empty_record: bool) {
    for _ in 0..MAX_REWRITES_PER_NODE {
      if self.is_aborted() {
        return;
      }
      let rewritten = match expr {
        Expression::CallExpression(call) => self.try_rewrite_placeholder_call(call),
        Expression::Identifier(ident) => self.try_rewrite_identifier(ident, allow_empty_record),
        _ => self.try_rewrite_member_expr(expr),
      };
      let Some(rewritten) = rewritten else {
        return;
      };
      *expr = rewritten;
    }
  }

  /// Visits an expression whose value may still be consumed as an export record, either by a
  /// declarator that collapses or by a member access on it.
  pub fn visit_record_operand(&mut self, expr: &mut Expression<'ast>) {
    if let Some(new_expr) = self.try_rewrite_member_expr(expr) {
      *expr = new_expr;
    }
    walk_mut::walk_expression(self, expr);
    self.rewrite_expression(expr, false);
  }

  fn try_rewrite_identifier(
    &mut self,
    ident: &ast::IdentifierReference<'ast>,
    allow_empty_record: bool,
  ) -> Option<Expression<'ast>> {
    if let Some(symbol) = self.symbol_of(ident) {
      self.visited_symbols.insert(symbol);
      let canonical = self.collapsed_symbols.get(&symbol)?;
      let canonical = self.ledger.resolve(canonical);
      return Some(self.snippet.id_ref_expr(&canonical, ident.span));
    }

    if let Some(&(importer, import)) = self.ctx.imports.get(ident.name.as_str()) {
      let target = match self.dependency_target(importer, &import.source) {
        Ok(Some(target)) => target,
        Ok(None) => return Some(self.missing_module_stub(importer, &import.source, ident.span)),
        Err(diagnostic) => {
          self.abort(diagnostic);
          return None;
        }
      };
      return self.finalized_expr_for_import(target, &import.imported, ident.span);
    }

    // An export record nobody declares belongs to a module without exports.
    let module = parse_exports_name(&ident.name)?;
    if allow_empty_record && self.ctx.bundle.contains(module) && !self.is_bound(&ident.name) {
      return Some(self.snippet.empty_object_expr(ident.span));
    }
    None
  }

  /// `$1$exports.foo`, or `x.foo` where `x` collapsed into `$1$exports`, becomes the binding
  /// behind `foo`.
  pub fn try_rewrite_member_expr(&self, expr: &Expression<'ast>) -> Option<Expression<'ast>> {
    let Expression::StaticMemberExpression(member) = expr else {
      return None;
    };
    let Expression::Identifier(object) = &member.object else {
      return None;
    };
    let object_name =
      match self.symbol_of(object).and_then(|symbol| self.collapsed_symbols.get(&symbol)) {
        Some(canonical) => self.ledger.resolve(canonical),
        None => Rstr::new(&object.name),
      };
    let module = parse_exports_name(&object_name)?;
    let canonical = self.resolver.resolve(&self.ledger, module, &member.property.name)?;
    Some(self.snippet.id_ref_expr(&canonical, member.span))
  }
}
