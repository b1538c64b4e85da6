pub mod checklists;
pub mod field_answers;
pub mod form_templates;
pub mod template_fields;
