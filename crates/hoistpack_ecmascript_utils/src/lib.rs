mod ast_snippet;
mod extensions;

pub use crate::{
  ast_snippet::AstSnippet,
  extensions::{expression_ext::ExpressionExt, statement_ext::StatementExt},
};
