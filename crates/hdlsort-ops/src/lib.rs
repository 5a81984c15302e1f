//! Operations behind each `hdlsort` command.
//!
//! Each `ops_*` module runs one pipeline end to end and returns a result the
//! CLI renders. Output drivers shared by those pipelines live in [`output`].

pub mod ops_analyze;
pub mod ops_order;
pub mod ops_units;
pub mod output;
