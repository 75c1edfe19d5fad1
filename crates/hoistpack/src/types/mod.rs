pub mod concat_output;
pub mod interop_cache;
pub mod replacement_ledger;

use std::sync::Arc;

use hoistpack_common::NormalizedConcatOptions;

pub type SharedOptions = Arc<NormalizedConcatOptions>;
