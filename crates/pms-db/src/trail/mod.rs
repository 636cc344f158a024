//! JSONL trail writer.
//!
//! Per-vessel JSONL files in `.pms/trail/` record every local mutation.

pub mod writer;
