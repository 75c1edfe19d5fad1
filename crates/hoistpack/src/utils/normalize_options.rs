use hoistpack_common::{ConcatOptions, NormalizedConcatOptions};

pub fn normalize_options(raw_options: ConcatOptions) -> NormalizedConcatOptions {
  let minify = raw_options.minify.unwrap_or(false);

  NormalizedConcatOptions {
    root_dir: raw_options
      .root_dir
      .unwrap_or_else(|| std::env::current_dir().unwrap_or_default()),
    minify,
    source_maps: raw_options.source_maps.unwrap_or(false),
    comments: raw_options.comments.unwrap_or(!minify),
  }
}

#[test]
fn test_comments_follow_minify_by_default() {
  let options = normalize_options(ConcatOptions { minify: Some(true), ..Default::default() });
  assert!(options.minify);
  assert!(!options.comments);
  assert!(!options.source_maps);

  let options = normalize_options(ConcatOptions {
    root_dir: Some("/project".into()),
    comments: Some(true),
    minify: Some(true),
    ..Default::default()
  });
  assert!(options.comments);
  assert_eq!(options.root_dir, std::path::Path::new("/project"));

  assert!(normalize_options(ConcatOptions::default()).comments);
}
