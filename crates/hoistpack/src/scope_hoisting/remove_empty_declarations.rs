use hoistpack_ecmascript_utils::StatementExt;
use oxc::{
  allocator,
  ast::{
    AstBuilder,
    ast::{self, Statement},
  },
  ast_visit::{VisitMut, walk_mut},
  span::SPAN,
};

/// Drops the `var` declarations left without declarators by collapsing.
pub struct RemoveEmptyDeclarations<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> VisitMut<'ast> for RemoveEmptyDeclarations<'ast> {
  fn visit_statements(&mut self, stmts: &mut allocator::Vec<'ast, Statement<'ast>>) {
    stmts.retain(|stmt| !stmt.is_empty_variable_declaration());
    walk_mut::walk_statements(self, stmts);
  }

  fn visit_statement(&mut self, stmt: &mut Statement<'ast>) {
    // Not part of a statement list, e.g. `if (a) var b = $1$exports;`
    if stmt.is_empty_variable_declaration() {
      *stmt = self.builder.statement_empty(SPAN);
      return;
    }
    walk_mut::walk_statement(self, stmt);
  }

  fn visit_for_statement(&mut self, stmt: &mut ast::ForStatement<'ast>) {
    if matches!(
      &stmt.init,
      Some(ast::ForStatementInit::VariableDeclaration(decl)) if decl.declarations.is_empty()
    ) {
      stmt.init = None;
    }
    walk_mut::walk_for_statement(self, stmt);
  }
}
