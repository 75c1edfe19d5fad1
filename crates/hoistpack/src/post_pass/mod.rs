mod remove_unused_synthetic_bindings;

use oxc::{
  allocator::Allocator,
  ast::ast::Program,
  minifier::{CompressOptions, Compressor, MangleOptions, Minifier, MinifierOptions},
  semantic::{Scoping, SemanticBuilder},
};

pub use remove_unused_synthetic_bindings::remove_unused_synthetic_bindings;

/// Cleans up declarations the rewrite left unreferenced. Runs once per bundle.
pub trait DeadCodeEliminator: Send + Sync {
  fn eliminate<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>);
}

/// Renames bindings of a finished program. Only invoked when minifying.
///
/// The returned `Scoping` carries the new names and is handed to the code generator.
pub trait ScopeMangler: Send + Sync {
  fn mangle<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) -> Option<Scoping>;
}

/// Drops unreferenced `$<id>$...` bindings, then runs oxc's dead code elimination.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcDeadCodeEliminator;

impl DeadCodeEliminator for OxcDeadCodeEliminator {
  fn eliminate<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) {
    let removed = remove_unused_synthetic_bindings(program);
    tracing::debug!(removed, "Removed unused synthetic bindings");

    let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
    let compressor = Compressor::new(allocator, CompressOptions::safest());
    compressor.dead_code_elimination_with_scoping(scoping, program);
  }
}

/// oxc's mangler, with program-level names included since a bundle owns its top-level scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcScopeMangler;

impl ScopeMangler for OxcScopeMangler {
  fn mangle<'a>(&self, allocator: &'a Allocator, program: &mut Program<'a>) -> Option<Scoping> {
    Minifier::new(MinifierOptions {
      mangle: Some(MangleOptions { top_level: true, ..MangleOptions::default() }),
      compress: None,
    })
    .build(allocator, program)
    .scoping
  }
}
