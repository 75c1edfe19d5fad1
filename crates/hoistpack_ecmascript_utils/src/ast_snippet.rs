use hoistpack_utils::ecmascript::is_validate_identifier_name;
use oxc::{
  allocator::Allocator,
  ast::{
    AstBuilder, NONE,
    ast::{self, Argument, ArrayExpressionElement, Expression, NumberBase, Statement},
  },
  span::{SPAN, Span},
};

type PassedStr<'a> = &'a str;

// `AstBuilder` is more suitable name, but it's already used in oxc.
pub struct AstSnippet<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  pub fn new(alloc: &'ast Allocator) -> Self {
    Self { builder: AstBuilder::new(alloc) }
  }

  #[inline]
  pub fn id_name(&self, name: PassedStr, span: Span) -> ast::IdentifierName<'ast> {
    self.builder.identifier_name(span, name)
  }

  #[inline]
  pub fn id_ref_expr(&self, name: PassedStr, span: Span) -> Expression<'ast> {
    self.builder.expression_identifier(span, name)
  }

  /// `[object].[property]`, or `[object]["property"]` when `property` isn't a valid identifier.
  pub fn member_access_expr(
    &self,
    object: Expression<'ast>,
    property: PassedStr,
    span: Span,
  ) -> Expression<'ast> {
    if is_validate_identifier_name(property) {
      Expression::StaticMemberExpression(self.builder.alloc_static_member_expression(
        span,
        object,
        self.id_name(property, SPAN),
        false,
      ))
    } else {
      Expression::ComputedMemberExpression(self.builder.alloc_computed_member_expression(
        span,
        object,
        self.string_literal_expr(property, SPAN),
        false,
      ))
    }
  }

  /// `[object].[property]`
  #[inline]
  pub fn literal_prop_access_member_expr_expr(
    &self,
    object: PassedStr,
    property: PassedStr,
    span: Span,
  ) -> Expression<'ast> {
    self.member_access_expr(self.id_ref_expr(object, SPAN), property, span)
  }

  /// `name(arg)`
  pub fn call_expr_with_arg_expr_expr(
    &self,
    name: PassedStr,
    arg: Expression<'ast>,
    span: Span,
  ) -> Expression<'ast> {
    self.builder.expression_call(
      span,
      self.builder.expression_identifier(SPAN, name),
      NONE,
      self.builder.vec1(Argument::from(arg)),
      false,
    )
  }

  /// `require([id]).[property]`
  pub fn require_by_id_prop_expr(&self, id: u32, property: PassedStr, span: Span) -> Expression<'ast> {
    let require_call =
      self.call_expr_with_arg_expr_expr("require", self.number_expr(f64::from(id)), SPAN);
    self.member_access_expr(require_call, property, span)
  }

  /// `var [name] = [init]`
  pub fn var_decl_stmt(&self, name: PassedStr, init: Expression<'ast>, span: Span) -> Statement<'ast> {
    let declarations = self.builder.vec1(self.builder.variable_declarator(
      SPAN,
      ast::VariableDeclarationKind::Var,
      self.builder.binding_pattern(
        self.builder.binding_pattern_kind_binding_identifier(SPAN, name),
        NONE,
        false,
      ),
      Some(init),
      false,
    ));

    Statement::VariableDeclaration(self.builder.alloc_variable_declaration(
      span,
      ast::VariableDeclarationKind::Var,
      declarations,
      false,
    ))
  }

  pub fn number_expr(&self, value: f64) -> Expression<'ast> {
    self.builder.expression_numeric_literal(SPAN, value, None, NumberBase::Decimal)
  }

  pub fn string_literal_expr(&self, value: PassedStr, span: Span) -> Expression<'ast> {
    self.builder.expression_string_literal(span, value, None)
  }

  /// `{}`
  pub fn empty_object_expr(&self, span: Span) -> Expression<'ast> {
    self.builder.expression_object(span, self.builder.vec(), None)
  }

  /// `[a, b, ...]`
  pub fn array_expr(
    &self,
    elements: impl IntoIterator<Item = Expression<'ast>>,
    span: Span,
  ) -> Expression<'ast> {
    let elements = self.builder.vec_from_iter(elements.into_iter().map(ArrayExpressionElement::from));
    self.builder.expression_array(span, elements, None)
  }
}

#[test]
fn member_access_falls_back_to_computed_keys() {
  let allocator = Allocator::default();
  let snippet = AstSnippet::new(&allocator);
  let expr = snippet.literal_prop_access_member_expr_expr("$1$exports", "foo", SPAN);
  assert!(matches!(expr, Expression::StaticMemberExpression(_)));
  let expr = snippet.literal_prop_access_member_expr_expr("$1$exports", "a-b", SPAN);
  assert!(matches!(expr, Expression::ComputedMemberExpression(_)));
}
