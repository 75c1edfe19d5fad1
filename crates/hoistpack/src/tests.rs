use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use arcstr::ArcStr;
use hoistpack_common::{
  BundleIdx, ConcatOptions, Dependency, ExportsKind, Module, ModuleGraph, ModuleId,
};
use hoistpack_error::{BuildResult, ConcatDiagnostic};
use oxc::{allocator::Allocator, ast::ast::Program, semantic::Scoping};

use crate::{ConcatOutput, Concatenator, DeadCodeEliminator, ScopeMangler};

fn module(id: u32) -> Module {
  Module::new(id, format!("/project/src/m{id}.js"))
}

fn commonjs_module(id: u32) -> Module {
  let mut module = module(id);
  module.exports_kind = ExportsKind::CommonJs;
  module
}

/// Every module goes into a single `/project/dist/main.js` bundle.
fn single_bundle(modules: Vec<Module>) -> (ModuleGraph, BundleIdx) {
  let mut graph = ModuleGraph::default();
  let ids = modules.iter().map(|module| module.id).collect::<Vec<_>>();
  for module in modules {
    graph.add_module(module);
  }
  let main = graph.add_bundle("/project/dist/main.js");
  for id in ids {
    graph.place_module(id, main);
  }
  (graph, main)
}

fn options() -> ConcatOptions {
  ConcatOptions { root_dir: Some("/project".into()), ..ConcatOptions::default() }
}

fn concat(graph: &ModuleGraph, bundle: BundleIdx, source: &str) -> BuildResult<ConcatOutput> {
  Concatenator::new(options()).concat(graph, bundle, source)
}

fn concat_code(graph: &ModuleGraph, bundle: BundleIdx, source: &str) -> String {
  match concat(graph, bundle, source) {
    Ok(output) => output.code,
    Err(err) => panic!("concatenation failed: {err}"),
  }
}

fn concat_diagnostic(graph: &ModuleGraph, bundle: BundleIdx, source: &str) -> String {
  let err = concat(graph, bundle, source).expect_err("concatenation should fail");
  assert!(err.diagnostic().is_some(), "unexpected error: {err}");
  err.to_string()
}

#[test]
fn named_import_becomes_direct_reference() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into()))).add_import("$1$import$x", "./m0", "x");
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code = concat_code(&graph, main, "var $0$export$x = 1;\nconsole.log($1$import$x);\n");
  assert!(code.contains("$0$export$x = 1"), "{code}");
  assert!(code.contains("console.log($0$export$x)"), "{code}");
  assert!(!code.contains("$1$import$x"), "{code}");
  assert!(!code.contains("require"), "{code}");
  assert!(!code.contains("$0$exports"), "{code}");
}

#[test]
fn import_through_wildcards_picks_first_source() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into()))).add_import("$0$import$y", "./m1", "y");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m2", Some(2.into())))
    .add_dependency(Dependency::new("./m3", Some(3.into())))
    .add_wildcard_source("./m2")
    .add_wildcard_source("./m3");
  let mut m2 = module(2);
  m2.add_local_export("y", "$2$export$y");
  let mut m3 = module(3);
  m3.add_local_export("y", "$3$export$y");
  let (graph, main) = single_bundle(vec![m0, m1, m2, m3]);

  let code = concat_code(
    &graph,
    main,
    "var $2$export$y = 2;\nvar $3$export$y = 3;\nconsole.log($0$import$y);\n",
  );
  assert!(code.contains("console.log($2$export$y)"), "{code}");
}

#[test]
fn default_is_not_imported_through_wildcards() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$0$import$default", "./m1", "default");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m2", Some(2.into()))).add_wildcard_source("./m2");
  let mut m2 = module(2);
  m2.add_local_export("default", "$2$export$default");
  let (graph, main) = single_bundle(vec![m0, m1, m2]);

  let message =
    concat_diagnostic(&graph, main, "var $2$export$default = 1;\nconsole.log($0$import$default);\n");
  assert_eq!(message, "src/m1.js does not export 'default'");
}

#[test]
fn member_access_on_export_record_is_collapsed() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into())));
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code =
    concat_code(&graph, main, "var $0$export$x = 1;\nconsole.log(__require__(1, \"./m0\").x);\n");
  assert!(code.contains("console.log($0$export$x)"), "{code}");
  assert!(!code.contains("__require__"), "{code}");
}

#[test]
fn constant_destructuring_is_collapsed() {
  let mut m0 = module(0);
  m0.add_local_export("a", "$0$export$a");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into())));
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code = concat_code(
    &graph,
    main,
    "var $0$export$a = 1;\nconst { a } = __require__(1, \"./m0\");\nconsole.log(a, { a });\n",
  );
  assert!(!code.contains("const"), "{code}");
  assert!(code.contains("console.log($0$export$a,"), "{code}");
  assert!(code.contains("a: $0$export$a"), "{code}");
}

#[test]
fn reassigned_destructuring_is_kept() {
  let mut m0 = module(0);
  m0.add_local_export("a", "$0$export$a");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into())));
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code = concat_code(
    &graph,
    main,
    "var $0$exports = {};\nvar $0$export$a = 1;\nlet { a } = __require__(1, \"./m0\");\na = 5;\nconsole.log(a);\n",
  );
  assert!(code.contains("= $0$exports"), "{code}");
  assert!(code.contains("a = 5"), "{code}");
  assert!(code.contains("console.log(a)"), "{code}");
}

#[test]
fn references_before_a_collapsed_binding_are_rewritten() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into())));
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code = concat_code(
    &graph,
    main,
    "var $0$export$x = 1;\nfunction read() {\n  return lib.x;\n}\nvar lib = __require__(1, \"./m0\");\nconsole.log(read(), lib.x);\n",
  );
  assert!(code.contains("return $0$export$x"), "{code}");
  assert!(code.contains("console.log(read(), $0$export$x)"), "{code}");
  assert!(!code.contains("lib"), "{code}");
}

#[test]
fn commonjs_default_imports_share_one_interop_binding() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$0$import$a", "./m1", "default")
    .add_import("$0$import$b", "./m1", "default")
    .add_import("$0$import$c", "./m1", "c");
  let (graph, main) = single_bundle(vec![m0, commonjs_module(1)]);

  let code = concat_code(
    &graph,
    main,
    "var $1$exports = {};\nfunction f() {\n  return $0$import$a;\n}\nconsole.log($0$import$b, f(), $0$import$c);\n",
  );
  assert_eq!(code.matches("$hoistpack$interopDefault(").count(), 1, "{code}");
  assert_eq!(code.matches("$1$interop$default.d").count(), 2, "{code}");
  assert!(code.contains("$1$exports.c"), "{code}");

  let declaration = code.find("var $1$interop$default").unwrap();
  assert!(declaration < code.find("function f").unwrap(), "{code}");
}

#[test]
fn commonjs_module_without_export_record_is_left_alone() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$0$import$a", "./m1", "default");
  let (graph, main) = single_bundle(vec![m0, commonjs_module(1)]);

  let code = concat_code(&graph, main, "console.log($0$import$a);\n");
  assert!(code.contains("console.log($0$import$a)"), "{code}");
}

#[test]
fn shadowed_import_names_are_not_rewritten() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into()))).add_import("$1$import$x", "./m0", "x");
  let (graph, main) = single_bundle(vec![m0, m1]);

  let code = concat_code(
    &graph,
    main,
    "var $0$export$x = 1;\nfunction f($1$import$x) {\n  return $1$import$x;\n}\nconsole.log(f(2), $1$import$x);\n",
  );
  assert!(code.contains("return $1$import$x"), "{code}");
  assert!(code.contains("console.log(f(2), $0$export$x)"), "{code}");
}

#[test]
fn optional_missing_dependency_becomes_runtime_stub() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("fs", None).optional());
  let (graph, main) = single_bundle(vec![m0]);

  let code = concat_code(&graph, main, "var fs = __require__(0, \"fs\");\nconsole.log(fs);\n");
  assert!(code.contains("$hoistpack$missingModule("), "{code}");
  assert!(code.contains("fs"), "{code}");
  assert!(!code.contains("__require__"), "{code}");
}

#[test]
fn required_missing_dependency_is_fatal() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./gone", None));
  let (graph, main) = single_bundle(vec![m0]);

  let err = concat(&graph, main, "var gone = __require__(0, \"./gone\");\n").unwrap_err();
  assert!(matches!(
    err.diagnostic(),
    Some(ConcatDiagnostic::MissingModule { specifier, importer: 0 }) if specifier == "./gone"
  ));
  assert_eq!(err.to_string(), "Cannot find module \"./gone\" in asset 0");
}

#[test]
fn export_record_of_module_without_exports_is_empty_object() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())));
  let (graph, main) = single_bundle(vec![m0, module(1)]);

  let code = concat_code(&graph, main, "console.log(__require__(0, \"./m1\"));\n");
  assert!(code.contains("console.log({})"), "{code}");
}

#[test]
fn missing_export_of_native_module_is_fatal() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$0$import$nope", "./m1", "nope");
  let (graph, main) = single_bundle(vec![m0, module(1)]);

  let message = concat_diagnostic(&graph, main, "console.log($0$import$nope);\n");
  assert_eq!(message, "src/m1.js does not export 'nope'");
}

#[test]
fn import_from_another_bundle_goes_through_runtime_require() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./other", Some(5.into())))
    .add_import("$0$import$y", "./other", "y");
  let mut m5 = module(5);
  m5.add_local_export("y", "$5$export$y");

  let mut graph = ModuleGraph::default();
  graph.add_module(m0);
  graph.add_module(m5);
  let main = graph.add_bundle("/project/dist/main.js");
  let other = graph.add_bundle("/project/dist/other.js");
  graph.place_module(0.into(), main);
  graph.place_module(5.into(), other);

  let code = concat_code(&graph, main, "console.log($0$import$y);\n");
  assert!(code.contains("require(5).y"), "{code}");
}

#[test]
fn require_resolve_lists_lazy_bundles() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./page", Some(1.into())).dynamic())
    .add_dependency(Dependency::new("./m2", Some(2.into())));

  let mut graph = ModuleGraph::default();
  graph.add_module(m0);
  graph.add_module(module(1));
  graph.add_module(module(2));
  let main = graph.add_bundle("/project/dist/main.js");
  let page = graph.add_bundle("/project/dist/lazy/page.js");
  let css = graph.add_bundle("/project/dist/lazy/page.css");
  let empty = graph.add_bundle("/project/dist/lazy/empty.css");
  graph.place_module(0.into(), main);
  graph.place_module(2.into(), main);
  graph.place_module(1.into(), page);
  graph.bundles[empty].is_empty = true;
  graph.bundles[main].child_bundles.insert(page);
  graph.bundles[page].sibling_bundles.insert(css);
  graph.bundles[page].sibling_bundles.insert(empty);

  let source =
    "var load = __requireResolve__(0, \"./page\");\nvar same = __requireResolve__(0, \"./m2\");\nuse(load, same);\n";
  let code = concat_code(&graph, main, source);
  let page_at = code.find("lazy/page.js").unwrap();
  let css_at = code.find("lazy/page.css").unwrap();
  assert!(page_at < css_at, "{code}");
  assert!(!code.contains("empty.css"), "{code}");
  assert!(code.contains("same = 2"), "{code}");

  graph.bundles[page].entry_module = Some(ModuleId::new(1));
  let code = concat_code(&graph, main, source);
  assert!(code.contains("lazy/page.js"), "{code}");
  assert!(!code.contains("__requireResolve__"), "{code}");
}

#[test]
fn placeholder_with_wrong_signature_is_fatal() {
  let (graph, main) = single_bundle(vec![module(0)]);

  let message = concat_diagnostic(&graph, main, "__require__(0);\n");
  assert_eq!(message, "invariant: invalid signature, expected : __require__(number, string)");

  let message = concat_diagnostic(&graph, main, "__requireResolve__(\"0\", \"./a\");\n");
  assert_eq!(message, "invariant: invalid signature, expected : __requireResolve__(number, string)");
}

#[test]
fn placeholder_from_unknown_module_is_fatal() {
  let (graph, main) = single_bundle(vec![module(0)]);
  let err = concat(&graph, main, "__require__(9, \"./x\");\n").unwrap_err();
  assert!(matches!(err.diagnostic(), Some(ConcatDiagnostic::UnknownModule { id: 9 })));
}

#[test]
fn minify_mangles_program_level_names() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into()))).add_import("$1$import$x", "./m0", "x");
  let (graph, main) = single_bundle(vec![m0, m1]);

  let concatenator =
    Concatenator::new(ConcatOptions { minify: Some(true), source_maps: Some(true), ..options() });
  let output = concatenator
    .concat(&graph, main, "var $0$export$x = 1;\nconsole.log($1$import$x);\n")
    .unwrap();
  assert!(!output.code.contains("$0$export$x"), "{}", output.code);
  assert!(output.code.contains("console.log("), "{}", output.code);
  assert!(output.map.is_some_and(|map| map.contains("\"mappings\"")));
}

#[test]
fn bundles_are_concatenated_independently() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x");
  let mut m1 = commonjs_module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into()))).add_import("$1$import$x", "./m0", "x");
  let mut m2 = module(2);
  m2.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$2$import$default", "./m1", "default");

  let mut graph = ModuleGraph::default();
  for module in [m0, m1, m2] {
    graph.add_module(module);
  }
  let main = graph.add_bundle("/project/dist/main.js");
  let other = graph.add_bundle("/project/dist/other.js");
  graph.place_module(0.into(), main);
  graph.place_module(1.into(), main);
  graph.place_module(1.into(), other);
  graph.place_module(2.into(), other);

  let inputs = [
    (main, ArcStr::from("var $0$export$x = 1;\nvar $1$exports = {};\nconsole.log($1$import$x);\n")),
    (other, ArcStr::from("var $1$exports = {};\nconsole.log($2$import$default, $2$import$default);\n")),
  ];
  let outputs = Concatenator::new(options()).concat_bundles(&graph, &inputs).unwrap();
  assert_eq!(outputs.len(), 2);
  assert!(outputs[0].code.contains("console.log($0$export$x)"), "{}", outputs[0].code);
  assert_eq!(outputs[1].code.matches("$hoistpack$interopDefault(").count(), 1, "{}", outputs[1].code);

  let inputs = [(main, ArcStr::from("console.log(__require__(7, \"./x\"));\n"))];
  let err = Concatenator::new(options()).concat_bundles(&graph, &inputs).unwrap_err();
  assert_eq!(err.len(), 1);
}

struct KeepEverything;

impl DeadCodeEliminator for KeepEverything {
  fn eliminate<'a>(&self, _allocator: &'a Allocator, _program: &mut Program<'a>) {}
}

#[derive(Clone, Default)]
struct CountingMangler(Arc<AtomicUsize>);

impl ScopeMangler for CountingMangler {
  fn mangle<'a>(&self, _allocator: &'a Allocator, _program: &mut Program<'a>) -> Option<Scoping> {
    self.0.fetch_add(1, Ordering::Relaxed);
    None
  }
}

#[test]
fn post_pass_collaborators_can_be_replaced() {
  let mut m0 = module(0);
  m0.add_local_export("x", "$0$export$x").add_local_export("unused", "$0$export$unused");
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into()))).add_import("$1$import$x", "./m0", "x");
  let (graph, main) = single_bundle(vec![m0, m1]);
  let source = "var $0$export$x = 1;\nvar $0$export$unused = 2;\nconsole.log($1$import$x);\n";

  let code = concat_code(&graph, main, source);
  assert!(!code.contains("$0$export$unused"), "{code}");

  let mangler = CountingMangler::default();
  let concatenator = Concatenator::new(options())
    .with_dead_code_eliminator(KeepEverything)
    .with_scope_mangler(mangler.clone());
  let output = concatenator.concat(&graph, main, source).unwrap();
  assert!(output.code.contains("$0$export$unused = 2"), "{}", output.code);
  assert_eq!(mangler.0.load(Ordering::Relaxed), 0);

  let concatenator = Concatenator::new(ConcatOptions { minify: Some(true), ..options() })
    .with_scope_mangler(mangler.clone());
  let output = concatenator.concat(&graph, main, source).unwrap();
  assert!(output.code.contains("$0$export$x"), "{}", output.code);
  assert_eq!(mangler.0.load(Ordering::Relaxed), 1);
}

/// Concatenates without dead code elimination, so the rewritten statements stay observable.
fn concat_code_unoptimized(graph: &ModuleGraph, bundle: BundleIdx, source: &str) -> String {
  let concatenator = Concatenator::new(options()).with_dead_code_eliminator(KeepEverything);
  match concatenator.concat(graph, bundle, source) {
    Ok(output) => output.code,
    Err(err) => panic!("concatenation failed: {err}"),
  }
}

fn graph_requiring_m0(exports: &[&str]) -> (ModuleGraph, BundleIdx) {
  let mut m0 = module(0);
  for name in exports {
    m0.add_local_export(name, &format!("$0$export${name}"));
  }
  let mut m1 = module(1);
  m1.add_dependency(Dependency::new("./m0", Some(0.into())));
  single_bundle(vec![m0, m1])
}

#[test]
fn redeclared_binding_is_kept() {
  let (graph, main) = graph_requiring_m0(&["x"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$exports = {};\nvar $0$export$x = 1;\nvar lib = __require__(1, \"./m0\");\nvar lib = 5;\nconsole.log(lib);\n",
  );
  assert!(code.contains("lib = $0$exports"), "{code}");
  assert!(code.contains("lib = 5"), "{code}");
  assert!(code.contains("console.log(lib)"), "{code}");
}

#[test]
fn binding_redeclared_by_for_in_is_kept() {
  let (graph, main) = graph_requiring_m0(&["x"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$exports = {};\nvar $0$export$x = 1;\nvar lib = __require__(1, \"./m0\");\nfor (var lib in { k: 1 }) {}\nconsole.log(lib);\n",
  );
  assert!(code.contains("lib = $0$exports"), "{code}");
  assert!(code.contains("console.log(lib)"), "{code}");
}

#[test]
fn interop_binding_follows_a_later_export_record() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./m1", Some(1.into())))
    .add_import("$0$import$a", "./m1", "default");
  let (graph, main) = single_bundle(vec![m0, commonjs_module(1)]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "function f() {\n  return $0$import$a;\n}\nvar $1$exports = { d: 1 };\nconsole.log(f());\n",
  );
  let record = code.find("var $1$exports").unwrap();
  let interop = code.find("var $1$interop$default").unwrap();
  let call = code.find("console.log(f())").unwrap();
  assert!(record < interop, "{code}");
  assert!(interop < call, "{code}");
  assert!(code.contains("return $1$interop$default.d"), "{code}");
}

#[test]
fn rest_destructuring_is_kept() {
  let (graph, main) = graph_requiring_m0(&["a"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$exports = {};\nvar $0$export$a = 1;\nconst { a, ...rest } = __require__(1, \"./m0\");\nconsole.log(a, rest);\n",
  );
  assert!(code.contains("...rest"), "{code}");
  assert!(code.contains("= $0$exports"), "{code}");
  assert!(code.contains("console.log(a, rest)"), "{code}");
}

#[test]
fn partially_resolvable_destructuring_keeps_the_rest() {
  let (graph, main) = graph_requiring_m0(&["a"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$exports = {};\nvar $0$export$a = 1;\nconst { a, b: c } = __require__(1, \"./m0\");\nconsole.log(a, c);\n",
  );
  assert!(code.contains("b: c"), "{code}");
  assert!(code.contains("= $0$exports"), "{code}");
  assert!(code.contains("console.log($0$export$a, c)"), "{code}");
}

#[test]
fn emptied_for_initializer_is_cleared() {
  let (graph, main) = graph_requiring_m0(&["x"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$export$x = 1;\nfor (var lib = __require__(1, \"./m0\"); ; ) {\n  console.log(lib.x);\n  break;\n}\n",
  );
  assert!(!code.contains("var lib"), "{code}");
  assert!(code.contains("console.log($0$export$x)"), "{code}");
}

#[test]
fn aliases_of_a_collapsed_binding_are_collapsed() {
  let (graph, main) = graph_requiring_m0(&["x"]);

  let code = concat_code_unoptimized(
    &graph,
    main,
    "var $0$export$x = 1;\nvar a = __require__(1, \"./m0\");\nvar b = a;\nconsole.log(b.x);\n",
  );
  assert!(code.contains("console.log($0$export$x)"), "{code}");
  assert!(!code.contains("var a"), "{code}");
  assert!(!code.contains("var b"), "{code}");
}

#[test]
fn require_resolve_of_missing_dependency() {
  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./page", None).optional());
  let (graph, main) = single_bundle(vec![m0]);

  let code =
    concat_code(&graph, main, "var load = __requireResolve__(0, \"./page\");\nuse(load);\n");
  assert!(code.contains("$hoistpack$missingModule("), "{code}");
  assert!(!code.contains("__requireResolve__"), "{code}");

  let mut m0 = module(0);
  m0.add_dependency(Dependency::new("./page", None));
  let (graph, main) = single_bundle(vec![m0]);

  let err = concat(&graph, main, "use(__requireResolve__(0, \"./page\"));\n").unwrap_err();
  assert!(matches!(
    err.diagnostic(),
    Some(ConcatDiagnostic::MissingModule { specifier, importer: 0 }) if specifier == "./page"
  ));
}
