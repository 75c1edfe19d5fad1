use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, Copy, Default, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum TraceFormat {
  #[default]
  Pretty,
  Json,
}
