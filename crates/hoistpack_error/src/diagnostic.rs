/// Fatal conditions of a concatenation run. Any of them aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ConcatDiagnostic {
  /// A placeholder call with the wrong arity or literal kinds.
  #[error("invariant: invalid signature, expected : {callee}(number, string)")]
  InvalidPlaceholderSignature { callee: &'static str },

  /// A non-optional dependency whose target cannot be resolved.
  #[error("Cannot find module \"{specifier}\" in asset {importer}")]
  MissingModule { specifier: String, importer: u32 },

  #[error("Module {id} is referenced by a placeholder call but is not known to the module graph")]
  UnknownModule { id: u32 },

  /// `path` is relative to the configured root directory.
  #[error("{path} does not export '{name}'")]
  MissingExport { path: String, name: String },

  #[error("Failed to parse {name}, got: {errors}")]
  ParseFailed { name: String, errors: String },
}

