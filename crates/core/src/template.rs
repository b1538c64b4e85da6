//! Form template model, DTOs and workflow state.
//!
//! A template is one version of a schema lineage identified by `code`.
//! Branching a new version creates a sibling row; fields are not copied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Default number of templates returned by a list query.
pub const DEFAULT_TEMPLATE_LIMIT: i64 = 50;

/// Hard ceiling for a list query's `limit`.
pub const MAX_TEMPLATE_LIMIT: i64 = 200;

/// Draft/approved lifecycle marker. Independent of `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Draft,
    Approved,
}

impl WorkflowState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Draft => "draft",
            WorkflowState::Approved => "approved",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(WorkflowState::Draft),
            "approved" => Ok(WorkflowState::Approved),
            other => Err(CoreError::Internal(format!(
                "Unknown workflow state '{other}'"
            ))),
        }
    }
}

/// A persisted form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub module: String,
    pub entity_type: String,
    pub process_id: Option<DbId>,
    pub version: i32,
    pub workflow_state: WorkflowState,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Template {
    pub fn is_approved(&self) -> bool {
        self.workflow_state == WorkflowState::Approved
    }
}

/// DTO for creating a new template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub module: String,
    pub entity_type: String,
    pub process_id: Option<DbId>,
    #[serde(default)]
    pub active: bool,
}

/// DTO for updating a template. `module` and `entity_type` are immutable.
///
/// `description` and `process_id` are nullable columns: an absent key keeps
/// the stored value, an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub process_id: Option<Option<DbId>>,
    pub active: Option<bool>,
}

/// Deserialize a present key (including `null`) as `Some`, so that together
/// with `#[serde(default)]` "absent" and "null" stay distinguishable.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Fully-resolved row handed to a store for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub module: String,
    pub entity_type: String,
    pub process_id: Option<DbId>,
    pub version: i32,
    pub workflow_state: WorkflowState,
    pub active: bool,
}

/// List filter. `None` means "do not filter on this column".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemplateFilter {
    pub module: Option<String>,
    pub entity_type: Option<String>,
    pub process_id: Option<DbId>,
    pub active: Option<bool>,
    pub limit: Option<i64>,
}

impl TemplateFilter {
    /// Whether a template passes every set criterion.
    pub fn matches(&self, template: &Template) -> bool {
        self.module.as_deref().is_none_or(|m| m == template.module)
            && self
                .entity_type
                .as_deref()
                .is_none_or(|e| e == template.entity_type)
            && self
                .process_id
                .is_none_or(|p| template.process_id == Some(p))
            && self.active.is_none_or(|a| a == template.active)
    }

    /// Effective row limit after clamping.
    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_TEMPLATE_LIMIT, MAX_TEMPLATE_LIMIT)
    }
}

/// Clamp a caller-supplied limit into `1..=max`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Reject blank values for required text attributes.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}

/// Validate a create payload before anything is persisted.
pub fn validate_create(input: &CreateTemplate) -> Result<(), CoreError> {
    require_non_blank("code", &input.code)?;
    require_non_blank("name", &input.name)?;
    require_non_blank("module", &input.module)?;
    require_non_blank("entity_type", &input.entity_type)?;
    Ok(())
}

/// Validate an update payload. Only supplied values are checked.
pub fn validate_update(input: &UpdateTemplate) -> Result<(), CoreError> {
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    Ok(())
}
