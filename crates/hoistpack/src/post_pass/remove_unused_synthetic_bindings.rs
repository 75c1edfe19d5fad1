use hoistpack_common::synthetic_names::is_synthetic_name;
use hoistpack_ecmascript_utils::StatementExt;
use oxc::{
  ast::ast::{self, BindingPatternKind, Expression, Program, Statement, UnaryOperator},
  semantic::{Scoping, SemanticBuilder},
};

/// Removes program-level `$<id>$...` declarators that nothing references and whose initializer
/// has no side effects. Repeats until nothing changes, since removing one binding may orphan
/// another. Returns the number of removed declarators.
pub fn remove_unused_synthetic_bindings(program: &mut Program) -> usize {
  let mut removed = 0;
  loop {
    let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
    let mut removed_in_round = 0;
    for stmt in program.body.iter_mut() {
      let Statement::VariableDeclaration(decl) = stmt else {
        continue;
      };
      let before = decl.declarations.len();
      decl.declarations.retain(|declarator| !is_unused_synthetic_binding(&scoping, declarator));
      removed_in_round += before - decl.declarations.len();
    }
    if removed_in_round == 0 {
      return removed;
    }
    program.body.retain(|stmt| !stmt.is_empty_variable_declaration());
    removed += removed_in_round;
  }
}

fn is_unused_synthetic_binding(scoping: &Scoping, declarator: &ast::VariableDeclarator) -> bool {
  let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind else {
    return false;
  };
  if !is_synthetic_name(&ident.name) {
    return false;
  }
  let Some(symbol) = ident.symbol_id.get() else {
    return false;
  };
  scoping.get_resolved_references(symbol).next().is_none()
    && declarator.init.as_ref().is_none_or(is_side_effect_free)
}

fn is_side_effect_free(expr: &Expression) -> bool {
  match expr {
    Expression::BooleanLiteral(_)
    | Expression::NullLiteral(_)
    | Expression::NumericLiteral(_)
    | Expression::StringLiteral(_)
    | Expression::BigIntLiteral(_)
    | Expression::Identifier(_)
    | Expression::FunctionExpression(_)
    | Expression::ArrowFunctionExpression(_) => true,
    Expression::ObjectExpression(object) => object.properties.is_empty(),
    Expression::ArrayExpression(array) => array.elements.is_empty(),
    Expression::UnaryExpression(unary) => {
      unary.operator == UnaryOperator::Void && is_side_effect_free(&unary.argument)
    }
    Expression::ParenthesizedExpression(paren) => is_side_effect_free(&paren.expression),
    _ => false,
  }
}

#[cfg(test)]
fn run(source: &str) -> String {
  use oxc::{allocator::Allocator, codegen::Codegen, parser::Parser, span::SourceType};

  let allocator = Allocator::default();
  let mut program = Parser::new(&allocator, source, SourceType::default().with_module(false)).parse().program;
  remove_unused_synthetic_bindings(&mut program);
  Codegen::new().build(&program).code
}

#[test]
fn removes_orphaned_bindings_to_a_fixpoint() {
  let code = run("var $1$exports = {};\nvar $1$export$a = $1$exports;\nvar $2$export$b = 1;\nuse($2$export$b);\n");
  assert!(!code.contains("$1$exports"));
  assert!(!code.contains("$1$export$a"));
  assert!(code.contains("$2$export$b = 1"));
}

#[test]
fn keeps_side_effects_and_user_bindings() {
  let code = run("var $1$export$a = init();\nvar unused = 1;\nvar $2$export$b = 1, keep = 2;\n");
  assert!(code.contains("$1$export$a = init()"));
  assert!(code.contains("unused = 1"));
  assert!(!code.contains("$2$export$b"));
  assert!(code.contains("keep = 2"));
}
