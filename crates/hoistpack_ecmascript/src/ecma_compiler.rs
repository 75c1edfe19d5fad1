use std::path::PathBuf;

use arcstr::ArcStr;
use hoistpack_error::{BuildResult, ConcatDiagnostic};
use oxc::{
  codegen::{Codegen, CodegenOptions, CodegenReturn},
  parser::{ParseOptions, Parser},
  semantic::Scoping,
  span::SourceType,
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

/// Options handed to the code generator once a bundle has been concatenated.
#[derive(Debug, Default, Clone)]
pub struct PrintOptions {
  pub minify: bool,
  pub comments: bool,
  /// Emit a source map attributed to this file name.
  pub source_map_path: Option<PathBuf>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(
    name: impl Into<ArcStr>,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { name: name.into(), source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      // Merged bundles keep top-level `return`s of former module bodies.
      let options = ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() };
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).with_options(options).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(ConcatDiagnostic::ParseFailed {
          name: owner.name.to_string(),
          errors: ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
        })
      }
    })?;

    Ok(EcmaAst { program })
  }

  pub fn print(ast: &EcmaAst) -> CodegenReturn {
    Codegen::new().build(ast.program())
  }

  /// `scoping` carries the renamed symbols of a mangling pass, if one ran.
  pub fn print_with(
    ast: &EcmaAst,
    options: &PrintOptions,
    scoping: Option<Scoping>,
  ) -> CodegenReturn {
    Codegen::new()
      .with_options(CodegenOptions {
        minify: options.minify,
        comments: options.comments,
        source_map_path: options.source_map_path.clone(),
        ..CodegenOptions::default()
      })
      .with_scoping(scoping)
      .build(ast.program())
  }
}

#[test]
fn basic_test() {
  let ast = EcmaCompiler::parse("test.js", "const a = 1;", SourceType::default()).unwrap();
  let code = EcmaCompiler::print(&ast).code;
  assert_eq!(code, "const a = 1;\n");
}

#[test]
fn top_level_return_is_accepted() {
  let ast = EcmaCompiler::parse("test.js", "if (a) return;", SourceType::default());
  assert!(ast.is_ok());
}

#[test]
fn parse_error_is_reported_with_name() {
  let err = EcmaCompiler::parse("broken.js", "var = ;", SourceType::default()).unwrap_err();
  assert!(matches!(err.diagnostic(), Some(ConcatDiagnostic::ParseFailed { name, .. }) if name == "broken.js"));
}
