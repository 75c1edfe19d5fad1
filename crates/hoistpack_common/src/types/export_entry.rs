use hoistpack_utils::rstr::Rstr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
  /// The export is declared by the module itself and bound to this top-level name.
  Local(Rstr),
  /// `export { imported as exported } from 'source'`
  ReExport { source: Rstr, imported: Rstr },
}
