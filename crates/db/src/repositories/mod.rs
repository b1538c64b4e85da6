//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod field_answer_repo;
pub mod form_template_repo;
pub mod template_field_repo;

pub use field_answer_repo::FieldAnswerRepo;
pub use form_template_repo::FormTemplateRepo;
pub use template_field_repo::TemplateFieldRepo;
