//! Row structs matching the database tables.
//!
//! Each submodule contains a `FromRow` struct plus its conversion into the
//! corresponding `qms_core` domain type. Text-encoded enums are parsed during
//! conversion; a value the domain does not know is an internal error.

pub mod field_answer;
pub mod form_template;
pub mod template_field;
