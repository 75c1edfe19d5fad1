use hoistpack_utils::rstr::Rstr;
use rustc_hash::FxHashMap;

/// Export record name of a CommonJS module -> the default interop binding synthesized for it.
///
/// At most one binding exists per export record within one concatenation run.
#[derive(Debug, Default)]
pub struct InteropCache {
  bindings: FxHashMap<Rstr, Rstr>,
}

impl InteropCache {
  /// Returns the binding for `exports_record` and whether it was created by this call.
  pub fn get_or_insert_with(
    &mut self,
    exports_record: &Rstr,
    create: impl FnOnce() -> Rstr,
  ) -> (Rstr, bool) {
    if let Some(binding) = self.bindings.get(exports_record.as_str()) {
      return (binding.clone(), false);
    }
    let binding = create();
    self.bindings.insert(exports_record.clone(), binding.clone());
    (binding, true)
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }
}

#[test]
fn test_interop_binding_is_created_once() {
  let mut cache = InteropCache::default();
  let record = Rstr::new("$3$exports");
  let (first, created) = cache.get_or_insert_with(&record, || "$3$interop$default".into());
  assert!(created);
  let (second, created) = cache.get_or_insert_with(&record, || unreachable!());
  assert!(!created);
  assert_eq!(first, second);
  assert_eq!(cache.len(), 1);
}
