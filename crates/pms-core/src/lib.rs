//! # pms-core
//!
//! Core types and pure logic for PMS change requests.
//!
//! A change request proposes edits to a planned-maintenance record
//! (component, work order, spare or store item) and routes them through a
//! draft → submitted → approved/rejected/returned workflow. This crate holds:
//! - Entity structs and status enums with their transition tables
//! - Field dictionaries per target type
//! - Snapshot capture, field diffing and the proposal builder
//! - Component relocation previews
//! - Lifecycle operations with guard and validation checks
//! - The draft editing session with optimistic save
//! - Trail envelope, audit details and response types

pub mod audit_detail;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod lifecycle;
pub mod path;
pub mod proposal;
pub mod relocation;
pub mod responses;
pub mod schema;
pub mod session;
pub mod snapshot;
pub mod trail;
pub mod value;
