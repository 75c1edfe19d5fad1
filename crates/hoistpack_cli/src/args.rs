use std::path::PathBuf;

use clap::Args;

use crate::types::trace_format::TraceFormat;

#[derive(Args)]
pub struct InputArgs {
  /// JSON description of the modules and bundles of the build.
  #[clap(long)]
  pub manifest: PathBuf,

  /// Index of the bundle in the manifest that `--input` belongs to.
  #[clap(long, short)]
  pub bundle: usize,

  /// Merged source of the bundle.
  #[clap(long, short)]
  pub input: PathBuf,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Defaults to stdout.
  #[clap(long, short = 'o')]
  pub output: Option<PathBuf>,

  #[clap(long)]
  pub source_maps: bool,
}

#[derive(Args)]
pub struct EnhanceArgs {
  #[clap(long, short = 'm')]
  pub minify: bool,

  #[clap(long)]
  pub trace: bool,

  #[clap(long, default_value = "pretty")]
  pub trace_format: TraceFormat,
}
