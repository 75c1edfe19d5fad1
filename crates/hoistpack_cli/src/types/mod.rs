pub mod trace_format;
