// ============================================================================
// Sitenav Core - Menu Option Entity
// File: crates/sitenav-core/src/domain/menu_option.rs
// Description: Menu tree node with absolute, named and model targets
// ============================================================================

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitenav_shared::constants::DEFAULT_MANAGER;
use validator::Validate;

use super::menu_group::GroupId;
use super::user::Permission;
use crate::error::DomainError;

pub type OptionId = i64;
pub type SiteId = i64;

/// Option type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Absolute,
    Named,
    Model,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Absolute => "absolute",
            OptionType::Named => "named",
            OptionType::Model => "model",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "absolute" => Some(OptionType::Absolute),
            "named" => Some(OptionType::Named),
            "model" => Some(OptionType::Model),
            _ => None,
        }
    }
}

impl Default for OptionType {
    fn default() -> Self {
        OptionType::Absolute
    }
}

/// Settings of an option that fans out into one entry per queried record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTarget {
    /// Route every generated entry links to.
    pub url_name: String,
    pub content_type: String,
    /// Named query entry point on the content type.
    pub manager: String,
    /// Filter template, e.g. `category__slug=%(category)s, published=true`.
    pub query: String,
    /// Route argument supplied by each record.
    pub url_id: String,
    /// Record field that supplies `url_id`.
    pub model_id: String,
    /// Comma separated sort keys, `-` prefix for descending.
    pub order_by: String,
    pub result_limit: Option<u32>,
}

/// Where a menu option points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuTarget {
    Absolute { url: String },
    Named { url_name: String },
    Model(ModelTarget),
}

impl MenuTarget {
    pub fn option_type(&self) -> OptionType {
        match self {
            MenuTarget::Absolute { .. } => OptionType::Absolute,
            MenuTarget::Named { .. } => OptionType::Named,
            MenuTarget::Model(_) => OptionType::Model,
        }
    }

    pub fn url_name(&self) -> Option<&str> {
        match self {
            MenuTarget::Absolute { .. } => None,
            MenuTarget::Named { url_name } => Some(url_name),
            MenuTarget::Model(model) => Some(&model.url_name),
        }
    }
}

/// Menu Option entity
///
/// Options form a tree through `parent_id`; the tree is held as an arena
/// keyed by [`OptionId`] so ancestor walks are plain lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuOption {
    pub id: OptionId,
    pub menu_group_id: GroupId,
    pub parent_id: Option<OptionId>,
    pub name: String,
    pub alt_text: String,
    pub notes: String,
    pub ordering: i32,

    // Visibility
    pub show_to_anonymous: bool,
    pub show_to_authenticated: bool,
    pub show_to_staff: bool,
    pub permissions: BTreeSet<Permission>,
    pub sites: BTreeSet<SiteId>,

    pub target: MenuTarget,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl MenuOption {
    pub fn option_type(&self) -> OptionType {
        self.target.option_type()
    }

    pub fn model_target(&self) -> Option<&ModelTarget> {
        match &self.target {
            MenuTarget::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Whether the sub menu may be expanded under an entry of this option.
    ///
    /// Model options only expand under the entry matching the current URL;
    /// absolute and named options always do.
    pub fn expands_children(&self, entry_selected: bool) -> bool {
        match self.target {
            MenuTarget::Model(_) => entry_selected,
            MenuTarget::Absolute { .. } | MenuTarget::Named { .. } => true,
        }
    }

    pub fn to_record(&self) -> MenuOptionRecord {
        let mut record = MenuOptionRecord {
            id: self.id,
            menu_group_id: self.menu_group_id,
            parent_id: self.parent_id,
            name: self.name.clone(),
            option_type: self.option_type(),
            alt_text: self.alt_text.clone(),
            notes: self.notes.clone(),
            ordering: self.ordering,
            show_to_anonymous: self.show_to_anonymous,
            show_to_authenticated: self.show_to_authenticated,
            show_to_staff: self.show_to_staff,
            permissions: self.permissions.iter().cloned().collect(),
            sites: self.sites.iter().copied().collect(),
            url: None,
            url_name: None,
            content_type: None,
            manager: default_manager(),
            query: String::new(),
            url_id: None,
            model_id: None,
            order_by: String::new(),
            result_limit: None,
            created_at: Some(self.created_at),
            modified_at: self.modified_at,
        };

        match &self.target {
            MenuTarget::Absolute { url } => record.url = Some(url.clone()),
            MenuTarget::Named { url_name } => record.url_name = Some(url_name.clone()),
            MenuTarget::Model(model) => {
                record.url_name = Some(model.url_name.clone());
                record.content_type = Some(model.content_type.clone());
                record.manager = Some(model.manager.clone());
                record.query = model.query.clone();
                record.url_id = Some(model.url_id.clone());
                record.model_id = Some(model.model_id.clone());
                record.order_by = model.order_by.clone();
                record.result_limit = model.result_limit;
            }
        }
        record
    }
}

fn default_true() -> bool {
    true
}

fn default_manager() -> Option<String> {
    Some(DEFAULT_MANAGER.to_string())
}

/// Flat, storage-shaped form of a menu option.
///
/// Carries one column per variant field, as an edit form or a database row
/// does. Call [`MenuOptionRecord::normalize`] before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MenuOptionRecord {
    pub id: OptionId,
    pub menu_group_id: GroupId,
    #[serde(default)]
    pub parent_id: Option<OptionId>,

    #[validate(length(min = 1, max = 256, message = "Option name must be between 1 and 256 characters"))]
    pub name: String,

    #[serde(default)]
    pub option_type: OptionType,

    #[validate(length(max = 256, message = "Alt text too long"))]
    #[serde(default)]
    pub alt_text: String,

    #[serde(default)]
    pub notes: String,

    pub ordering: i32,

    #[serde(default)]
    pub show_to_anonymous: bool,
    #[serde(default = "default_true")]
    pub show_to_authenticated: bool,
    #[serde(default = "default_true")]
    pub show_to_staff: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub sites: Vec<SiteId>,

    // Absolute
    #[validate(length(min = 1, max = 200, message = "URL must be between 1 and 200 characters"))]
    #[serde(default)]
    pub url: Option<String>,

    // Named and model
    #[validate(length(min = 1, max = 64, message = "URL name must be between 1 and 64 characters"))]
    #[serde(default)]
    pub url_name: Option<String>,

    // Model only
    #[serde(default)]
    pub content_type: Option<String>,
    #[validate(length(max = 32, message = "Manager name too long"))]
    #[serde(default = "default_manager")]
    pub manager: Option<String>,
    #[serde(default)]
    pub query: String,
    #[validate(length(max = 64, message = "URL id too long"))]
    #[serde(default)]
    pub url_id: Option<String>,
    #[validate(length(max = 64, message = "Model id too long"))]
    #[serde(default)]
    pub model_id: Option<String>,
    #[validate(length(max = 64, message = "Order by too long"))]
    #[serde(default)]
    pub order_by: String,
    #[serde(default)]
    pub result_limit: Option<u32>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl MenuOptionRecord {
    /// Clears every field that does not belong to `option_type`.
    pub fn normalize(&mut self) {
        match self.option_type {
            OptionType::Absolute => {
                self.url_name = None;
                self.clear_model_fields();
            }
            OptionType::Named => {
                self.url = None;
                self.clear_model_fields();
            }
            OptionType::Model => {
                self.url = None;
            }
        }
    }

    fn clear_model_fields(&mut self) {
        self.content_type = None;
        self.manager = default_manager();
        self.query = String::new();
        self.url_id = None;
        self.model_id = None;
        self.order_by = String::new();
        self.result_limit = None;
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DomainError::IncompleteOption(field)),
    }
}

impl TryFrom<MenuOptionRecord> for MenuOption {
    type Error = DomainError;

    fn try_from(record: MenuOptionRecord) -> Result<Self, Self::Error> {
        let target = match record.option_type {
            OptionType::Absolute => MenuTarget::Absolute {
                url: required(record.url, "url")?,
            },
            OptionType::Named => MenuTarget::Named {
                url_name: required(record.url_name, "url_name")?,
            },
            OptionType::Model => MenuTarget::Model(ModelTarget {
                url_name: required(record.url_name, "url_name")?,
                content_type: required(record.content_type, "content_type")?,
                manager: record
                    .manager
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MANAGER.to_string()),
                query: record.query,
                url_id: required(record.url_id, "url_id")?,
                model_id: required(record.model_id, "model_id")?,
                order_by: record.order_by,
                result_limit: record.result_limit,
            }),
        };

        Ok(MenuOption {
            id: record.id,
            menu_group_id: record.menu_group_id,
            parent_id: record.parent_id,
            name: record.name.trim().to_string(),
            alt_text: record.alt_text,
            notes: record.notes,
            ordering: record.ordering,
            show_to_anonymous: record.show_to_anonymous,
            show_to_authenticated: record.show_to_authenticated,
            show_to_staff: record.show_to_staff,
            permissions: record.permissions.into_iter().collect(),
            sites: record.sites.into_iter().collect(),
            target,
            created_at: record.created_at.unwrap_or_else(Utc::now),
            modified_at: record.modified_at,
        })
    }
}
