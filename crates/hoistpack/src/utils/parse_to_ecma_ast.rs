use arcstr::ArcStr;
use hoistpack_ecmascript::{EcmaAst, EcmaCompiler};
use hoistpack_error::{BuildResult, ConcatDiagnostic};
use oxc::{
  ast::ast::Program,
  semantic::{Scoping, SemanticBuilder},
  span::SourceType,
};

/// Parses the merged source of a bundle. Former module bodies may `return` at the top level
/// and are not strict by default, so the bundle is parsed as a script.
pub fn parse_to_ecma_ast(name: &ArcStr, source: ArcStr) -> BuildResult<EcmaAst> {
  EcmaCompiler::parse(name.clone(), source, SourceType::default().with_module(false))
}

pub fn make_ast_scoping(name: &str, program: &Program) -> Result<Scoping, ConcatDiagnostic> {
  let semantic_ret = SemanticBuilder::new().build(program);
  if !semantic_ret.errors.is_empty() {
    return Err(ConcatDiagnostic::ParseFailed {
      name: name.to_string(),
      errors: semantic_ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
    });
  }
  Ok(semantic_ret.semantic.into_scoping())
}
