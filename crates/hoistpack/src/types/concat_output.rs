#[derive(Debug, Clone)]
pub struct ConcatOutput {
  pub code: String,
  /// Source map JSON, when source maps are enabled.
  pub map: Option<String>,
}

impl ConcatOutput {
  pub fn size(&self) -> usize {
    self.code.len()
  }
}
