//! Repository modules implementing storage operations for change requests.
//!
//! Each module adds methods to `PmsService` via `impl PmsService` blocks.

pub mod attachment;
pub mod audit;
pub mod change_request;
pub mod comment;
