//! The naming convention shared by the per-module transform, this pass and the runtime.
//! Later passes match on these names, so they must stay bit-exact.

use std::sync::LazyLock;

use regex::Regex;

use crate::ModuleId;

/// `__require__(moduleId, 'specifier')`
pub const REQUIRE_PLACEHOLDER: &str = "__require__";
/// `__requireResolve__(moduleId, 'specifier')`
pub const REQUIRE_RESOLVE_PLACEHOLDER: &str = "__requireResolve__";

/// Runtime helper unwrapping `.d` of a native default export, or returning a dynamic export
/// object as is.
pub const INTEROP_DEFAULT_HELPER: &str = "$hoistpack$interopDefault";
/// Runtime helper throwing for an optional dependency that is absent from the build.
pub const MISSING_MODULE_HELPER: &str = "$hoistpack$missingModule";

static EXPORTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$(\d+)\$exports$").unwrap());
static SYNTHETIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$\d+\$").unwrap());

/// `$<id>$exports`
pub fn exports_name(id: ModuleId) -> String {
  format!("${id}$exports")
}

/// `$<id>$interop$default`
pub fn interop_default_name(id: ModuleId) -> String {
  format!("${id}$interop$default")
}

/// The owner of an export record identifier.
pub fn parse_exports_name(name: &str) -> Option<ModuleId> {
  let captures = EXPORTS_RE.captures(name)?;
  captures[1].parse::<u32>().ok().map(ModuleId::new)
}

/// Whether `name` belongs to the `$<id>$...` family generated by the module transform.
pub fn is_synthetic_name(name: &str) -> bool {
  SYNTHETIC_RE.is_match(name)
}

#[test]
fn test_exports_name_round_trips() {
  let id = ModuleId::new(12);
  assert_eq!(exports_name(id), "$12$exports");
  assert_eq!(parse_exports_name("$12$exports"), Some(id));
  assert_eq!(parse_exports_name("$12$exports2"), None);
  assert_eq!(parse_exports_name("$a$exports"), None);
  assert_eq!(parse_exports_name("$99999999999$exports"), None);
}

#[test]
fn test_interop_and_synthetic_names() {
  assert_eq!(interop_default_name(ModuleId::new(4)), "$4$interop$default");
  assert!(is_synthetic_name("$4$interop$default"));
  assert!(!is_synthetic_name("$hoistpack$interopDefault"));
}
