//! Query parameter types for API handlers that are not domain filters.

use serde::Deserialize;
use qms_core::types::DbId;

/// `?code=` for the version-history listing.
#[derive(Debug, Deserialize)]
pub struct VersionParams {
    pub code: String,
}

/// `?entity_id=` for answer listing.
#[derive(Debug, Deserialize)]
pub struct EntityParams {
    pub entity_id: DbId,
}
