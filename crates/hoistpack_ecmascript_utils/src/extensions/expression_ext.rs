use oxc::ast::ast;

pub trait ExpressionExt<'ast> {
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>>;
  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>>;
  fn as_numeric_literal(&self) -> Option<&ast::NumericLiteral<'ast>>;
}

impl<'ast> ExpressionExt<'ast> for ast::Expression<'ast> {
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>> {
    if let ast::Expression::Identifier(ident) = self { Some(ident) } else { None }
  }

  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>> {
    let ast::Expression::StringLiteral(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_numeric_literal(&self) -> Option<&ast::NumericLiteral<'ast>> {
    let ast::Expression::NumericLiteral(expr) = self else {
      return None;
    };
    Some(expr)
  }
}
