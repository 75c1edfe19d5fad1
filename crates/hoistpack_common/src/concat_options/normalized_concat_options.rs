use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct NormalizedConcatOptions {
  pub root_dir: PathBuf,
  pub minify: bool,
  pub source_maps: bool,
  pub comments: bool,
}
