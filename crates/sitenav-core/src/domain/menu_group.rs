// ============================================================================
// Sitenav Core - Menu Group Entity
// File: crates/sitenav-core/src/domain/menu_group.rs
// Description: Named collection of menu options
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub type GroupId = i64;

/// A named collection of menu trees, e.g. "top nav" or "side menu".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MenuGroup {
    pub id: GroupId,

    #[validate(length(min = 1, max = 256, message = "Group name must be between 1 and 256 characters"))]
    pub name: String,

    /// Administrative notes, never shown to visitors.
    #[serde(default)]
    pub notes: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MenuGroup {
    pub fn new(id: GroupId, name: String, notes: String) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            id,
            name: name.trim().to_string(),
            notes,
            created_at: Utc::now(),
        };

        group.validate()?;
        Ok(group)
    }
}
