oxc_index::define_index_type! {
  #[derive(Default)]
  pub struct BundleIdx = u32;
}
