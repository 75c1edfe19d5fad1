use hoistpack_common::{ModuleId, synthetic_names::parse_exports_name};
use hoistpack_utils::rstr::Rstr;
use oxc::{
  ast::ast::{self, BindingPatternKind, Expression},
  semantic::Reference,
};

use super::ScopeHoistingFinalizer;

impl<'ast> ScopeHoistingFinalizer<'_, 'ast> {
  /// `var x = $1$exports` and `var { a, b: c } = $1$exports`.
  ///
  /// Returns `true` when nothing is left of the declarator and it must be removed.
  pub fn try_collapse_declarator(&mut self, decl: &mut ast::VariableDeclarator<'ast>) -> bool {
    let Some(Expression::Identifier(init)) = &decl.init else {
      return false;
    };
    let Some(module) = parse_exports_name(&init.name) else {
      return false;
    };
    let record = Rstr::new(&init.name);

    match &mut decl.id.kind {
      BindingPatternKind::BindingIdentifier(ident) => self.collapse_binding(ident, &record),
      // `...rest` would pick up every key collapsed out of the pattern.
      BindingPatternKind::ObjectPattern(pattern) if pattern.rest.is_none() => {
        // Unresolvable properties stay as they are.
        pattern.properties.retain(|property| !self.try_collapse_property(module, property));
        pattern.properties.is_empty()
      }
      _ => false,
    }
  }

  fn try_collapse_property(
    &mut self,
    module: ModuleId,
    property: &ast::BindingProperty<'ast>,
  ) -> bool {
    if property.computed {
      return false;
    }
    let ast::PropertyKey::StaticIdentifier(key) = &property.key else {
      return false;
    };
    let BindingPatternKind::BindingIdentifier(value) = &property.value.kind else {
      return false;
    };
    let Some(canonical) = self.resolver.resolve(&self.ledger, module, &key.name) else {
      return false;
    };
    self.collapse_binding(value, &canonical)
  }

  /// Makes every use of `ident` read `canonical` instead. Bindings written or redeclared anywhere
  /// are left alone, their value may differ from the export at some use sites.
  fn collapse_binding(&mut self, ident: &ast::BindingIdentifier<'ast>, canonical: &Rstr) -> bool {
    let Some(symbol) = ident.symbol_id.get() else {
      return false;
    };
    let scoping = self.ctx.scoping;
    if scoping.get_resolved_references(symbol).any(Reference::is_write)
      || !scoping.symbol_redeclarations(symbol).is_empty()
    {
      tracing::debug!(local = %ident.name, %canonical, "Binding is not constant, not collapsing it");
      return false;
    }

    self.ledger.insert(ident.name.as_str(), canonical.clone());
    self.collapsed_symbols.insert(symbol, canonical.clone());
    if self.visited_symbols.contains(&symbol) {
      self.needs_another_sweep = true;
    }
    tracing::debug!(local = %ident.name, %canonical, "Collapsed binding");
    true
  }
}
