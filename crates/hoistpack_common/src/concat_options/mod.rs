pub mod normalized_concat_options;

use std::path::PathBuf;

#[derive(Default, Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConcatOptions {
  /// Base directory diagnostics print module paths relative to.
  pub root_dir: Option<PathBuf>,
  pub minify: Option<bool>,
  pub source_maps: Option<bool>,
  /// Keep comments in the output. Defaults to `!minify`.
  pub comments: Option<bool>,
}
