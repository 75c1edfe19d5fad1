#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use hoistpack::{ConcatOptions, Concatenator, Dependency, Module, ModuleGraph};
use sugar_path::SugarPath;

// Two modules that were already transformed and merged into a single source.
const MERGED: &str = r#"
var $0$export$greeting = "hello";
var $0$export$default = function (name) {
  return $0$export$greeting + ", " + name;
};
var $1$exports = {};
const { greeting } = __require__(1, "./greet");
$1$exports.message = $1$import$greet(greeting);
console.log($1$exports.message);
"#;

fn main() {
  let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("examples/basic").normalize();

  let mut graph = ModuleGraph::default();
  graph
    .add_module(Module::new(0, root.join("greet.js")))
    .add_local_export("greeting", "$0$export$greeting")
    .add_local_export("default", "$0$export$default");
  graph
    .add_module(Module::new(1, root.join("entry.js")))
    .add_dependency(Dependency::new("./greet", Some(0.into())))
    .add_import("$1$import$greet", "./greet", "default");
  let main = graph.add_bundle(&root.join("dist/main.js").to_string_lossy());
  graph.place_module(0.into(), main);
  graph.place_module(1.into(), main);

  let concatenator = Concatenator::new(ConcatOptions { root_dir: Some(root), ..Default::default() });
  match concatenator.concat(&graph, main, MERGED) {
    Ok(output) => println!("{}", output.code),
    Err(err) => println!("{err}"),
  }
}
