//! Domain errors

use thiserror::Error;

use crate::domain::{GroupId, OptionId};

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Menu group not found: {0}")]
    GroupNotFound(String),

    #[error("Menu option not found: {0}")]
    OptionNotFound(OptionId),

    #[error("Parent option {parent} belongs to group {parent_group}, not {group}")]
    ParentInOtherGroup { parent: OptionId, parent_group: GroupId, group: GroupId },

    #[error("Setting parent {parent} on option {option} would create a cycle")]
    ParentCycle { option: OptionId, parent: OptionId },

    #[error("Menu option is missing {0}")]
    IncompleteOption(&'static str),

    #[error("Invalid tag name: {0}")]
    InvalidTagName(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

/// Failures while building or running a record query.
///
/// Every variant is absorbed by the query service; only `Store` is treated
/// as unexpected and logged at error level.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Query template needs argument '{0}'")]
    MissingArgument(String),

    #[error("Malformed query template: {0}")]
    MalformedTemplate(String),

    #[error("Malformed filter clause: {0}")]
    MalformedClause(String),

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    #[error("Unknown manager '{manager}' on {content_type}")]
    UnknownManager { content_type: String, manager: String },

    #[error("Unknown field '{field}' on {content_type}")]
    UnknownField { content_type: String, field: String },

    #[error("Record store failure: {0}")]
    Store(String),
}

impl QueryError {
    pub fn is_unexpected(&self) -> bool {
        matches!(self, QueryError::Store(_))
    }
}
