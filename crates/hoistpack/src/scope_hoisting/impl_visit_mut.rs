use hoistpack_ecmascript_utils::StatementExt;
use oxc::{
  ast::ast::{self, Expression},
  ast_visit::{VisitMut, walk_mut},
};

use super::ScopeHoistingFinalizer;

impl<'ast> VisitMut<'ast> for ScopeHoistingFinalizer<'_, 'ast> {
  fn visit_program(&mut self, program: &mut ast::Program<'ast>) {
    let mut index = 0;
    while index < program.body.len() && !self.is_aborted() {
      self.visit_statement(&mut program.body[index]);
      if !self.pending_top_level_stmts.is_empty() {
        let mut before = Vec::new();
        for (record, stmt) in std::mem::take(&mut self.pending_top_level_stmts) {
          // Never evaluated ahead of the export record it reads.
          let declared_later =
            program.body[index + 1..].iter().position(|later| later.declares_variable(&record));
          match declared_later {
            Some(offset) => program.body.insert(index + offset + 2, stmt),
            None => before.push(stmt),
          }
        }
        let inserted = before.len();
        program.body.splice(index..index, before);
        index += inserted;
      }
      index += 1;
    }
  }

  fn visit_expression(&mut self, expr: &mut Expression<'ast>) {
    if self.is_aborted() {
      return;
    }
    // `$1$exports.foo` is matched as a whole before its object is looked at alone.
    if let Some(new_expr) = self.try_rewrite_member_expr(expr) {
      *expr = new_expr;
    }
    if let Expression::StaticMemberExpression(member) = expr {
      self.visit_record_operand(&mut member.object);
      if let Some(new_expr) = self.try_rewrite_member_expr(expr) {
        *expr = new_expr;
      } else if let Expression::StaticMemberExpression(member) = expr {
        self.rewrite_expression(&mut member.object, true);
      }
    } else {
      walk_mut::walk_expression(self, expr);
    }
    self.rewrite_expression(expr, true);
  }

  fn visit_variable_declaration(&mut self, decl: &mut ast::VariableDeclaration<'ast>) {
    let mut index = 0;
    while index < decl.declarations.len() && !self.is_aborted() {
      let declarator = &mut decl.declarations[index];
      self.visit_binding_pattern(&mut declarator.id);
      if let Some(init) = &mut declarator.init {
        self.visit_record_operand(init);
      }

      if self.try_collapse_declarator(declarator) {
        decl.declarations.remove(index);
      } else {
        if let Some(init) = &mut declarator.init {
          self.rewrite_expression(init, true);
        }
        index += 1;
      }
    }
  }

  fn visit_object_property(&mut self, prop: &mut ast::ObjectProperty<'ast>) {
    walk_mut::walk_object_property(self, prop);

    // Ensure `{ a }` would be rewritten to `{ a: $1$export$a }` instead of `{ $1$export$a }`
    if prop.shorthand {
      prop.shorthand = matches!(
        (&prop.key, &prop.value),
        (ast::PropertyKey::StaticIdentifier(key), Expression::Identifier(value)) if key.name == value.name
      );
    }
  }
}
