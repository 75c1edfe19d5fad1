/// How a module's export surface is known.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExportsKind {
  /// Native `export` syntax. Every export is statically enumerable, so a missing export is an
  /// error.
  #[default]
  Esm,
  /// `module.exports`/`exports.foo` style. The export surface is only fully known at runtime,
  /// so unknown names fall back to property access on the export record.
  CommonJs,
}
