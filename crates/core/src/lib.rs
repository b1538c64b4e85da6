//! Domain core of the ISO-9001 checklist engine.
//!
//! Holds the template/field/answer model, the per-field-type dispatch table,
//! the canonical ISO field list with gap analysis, the store ports and the
//! [`engine::ChecklistEngine`] that composes them into use cases. Nothing in
//! this crate talks to a database directly.

pub mod answer;
pub mod engine;
pub mod error;
pub mod field;
pub mod field_type;
pub mod iso_template;
pub mod memory;
pub mod options;
pub mod ports;
pub mod template;
pub mod types;
