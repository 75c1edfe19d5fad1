mod args;
mod types;

use std::{fs, path::Path, time::Instant};

use ansi_term::Colour;
use anyhow::Context;
use args::{EnhanceArgs, InputArgs, OutputArgs};
use clap::Parser;
use tracing_subscriber::fmt::format::FmtSpan;
use types::trace_format::TraceFormat;

use hoistpack::{BundleIdx, ConcatOutput, Concatenator, Manifest};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  enhance: EnhanceArgs,
}

fn init_tracing(enhance: &EnhanceArgs) {
  if !enhance.trace {
    return;
  }
  let builder = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(tracing::Level::DEBUG)
    .with_writer(std::io::stderr);
  let _ = match enhance.trace_format {
    TraceFormat::Pretty => builder.try_init(),
    TraceFormat::Json => builder.json().with_ansi(false).try_init(),
  };
}

fn write_output(output: &ConcatOutput, path: Option<&Path>) -> anyhow::Result<()> {
  let Some(path) = path else {
    print!("{}", output.code);
    return Ok(());
  };

  let mut code = output.code.clone();
  if let Some(map) = &output.map {
    let map_path = path.with_extension("js.map");
    fs::write(&map_path, map).with_context(|| format!("Failed to write {}", map_path.display()))?;
    if let Some(file_name) = map_path.file_name() {
      code.push_str(&format!("//# sourceMappingURL={}\n", file_name.to_string_lossy()));
    }
  }
  fs::write(path, code).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_summary(bundle: &str, output: &ConcatOutput) {
  let size = format!("{:.2}", output.size() as f64 / 1024.0);
  let dim = Colour::White.dimmed();

  eprintln!("{}{}{} kB", Colour::Cyan.paint(bundle), dim.paint(" │ size: "), size);
}

fn run(args: &Commands) -> anyhow::Result<(String, ConcatOutput)> {
  let manifest = fs::read_to_string(&args.input.manifest)
    .with_context(|| format!("Failed to read {}", args.input.manifest.display()))?;
  let (graph, mut options) = Manifest::from_json(&manifest)?.into_graph()?;
  if args.enhance.minify {
    options.minify = Some(true);
  }
  if args.output.source_maps {
    options.source_maps = Some(true);
  }

  let bundle_idx = BundleIdx::from_usize(args.input.bundle);
  let bundle = graph
    .bundle(bundle_idx)
    .with_context(|| format!("Bundle {} is not declared in the manifest", args.input.bundle))?;
  let source = fs::read_to_string(&args.input.input)
    .with_context(|| format!("Failed to read {}", args.input.input.display()))?;

  let output = Concatenator::new(options)
    .concat(&graph, bundle_idx, source)
    .map_err(|errors| anyhow::anyhow!("{errors}"))?;
  Ok((bundle.name.to_string(), output))
}

fn main() {
  let args = Commands::parse();
  init_tracing(&args.enhance);

  let start = Instant::now();
  let result = run(&args).and_then(|(bundle, output)| {
    write_output(&output, args.output.output.as_deref())?;
    Ok((bundle, output))
  });
  match result {
    Ok((bundle, output)) => {
      print_summary(&bundle, &output);
      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      eprintln!("{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
    }
    Err(error) => {
      eprintln!("{} {:#}", Colour::Red.paint("Error:"), error);
      std::process::exit(1);
    }
  }
}
