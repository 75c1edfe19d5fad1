pub mod dependency;
pub mod export_entry;
pub mod exports_kind;
pub mod module_id;
pub mod named_import;
pub mod raw_idx;
