use hoistpack_utils::rstr::Rstr;

/// `import { imported } from 'source'`, as seen from the local binding it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImport {
  pub source: Rstr,
  /// `default`, `*` or a plain export name.
  pub imported: Rstr,
}
