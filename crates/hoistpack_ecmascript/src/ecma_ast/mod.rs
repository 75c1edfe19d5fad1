pub mod program_cell;

use std::fmt::Debug;

use arcstr::ArcStr;
use oxc::ast::ast::Program;

use self::program_cell::ProgramCell;

/// The merged program of one bundle.
///
/// - To access `&mut ast::Program`, use `ast.program.with_mut(|fields| { fields.program; })`.
pub struct EcmaAst {
  pub program: ProgramCell,
}

impl EcmaAst {
  pub fn name(&self) -> &ArcStr {
    &self.program.borrow_owner().name
  }

  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }
}

impl Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EcmaAst")
      .field("name", self.name())
      .field("source", self.source())
      .finish_non_exhaustive()
  }
}
