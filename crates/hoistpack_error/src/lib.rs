mod diagnostic;

use std::ops::{Deref, DerefMut};

pub use crate::diagnostic::ConcatDiagnostic;

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Returns the first diagnostic of the concatenation taxonomy carried by this error, if any.
  pub fn diagnostic(&self) -> Option<&ConcatDiagnostic> {
    self.0.iter().find_map(|error| error.downcast_ref::<ConcatDiagnostic>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, error) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<ConcatDiagnostic> for BuildError {
  fn from(diagnostic: ConcatDiagnostic) -> Self {
    Self(vec![diagnostic.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn diagnostic_survives_anyhow_wrapping() {
  let error = BuildError::from(ConcatDiagnostic::MissingExport {
    path: "src/a.js".to_string(),
    name: "foo".to_string(),
  });
  assert_eq!(error.to_string(), "src/a.js does not export 'foo'");
  assert!(matches!(error.diagnostic(), Some(ConcatDiagnostic::MissingExport { .. })));
}
