use oxc::ast::ast;

pub trait StatementExt<'ast> {
  /// `var;`-like leftovers: a variable declaration whose declarators were all removed.
  fn is_empty_variable_declaration(&self) -> bool;

  /// `var name = ...`, possibly among other declarators.
  fn declares_variable(&self, name: &str) -> bool;
}

impl<'ast> StatementExt<'ast> for ast::Statement<'ast> {
  fn is_empty_variable_declaration(&self) -> bool {
    matches!(self, ast::Statement::VariableDeclaration(decl) if decl.declarations.is_empty())
  }

  fn declares_variable(&self, name: &str) -> bool {
    let ast::Statement::VariableDeclaration(decl) = self else {
      return false;
    };
    decl.declarations.iter().any(|declarator| {
      matches!(
        &declarator.id.kind,
        ast::BindingPatternKind::BindingIdentifier(ident) if ident.name.as_str() == name
      )
    })
  }
}
