//! Record store trait (port)

use async_trait::async_trait;

use crate::domain::{ContentTypeSchema, Record, RecordQuery};
use crate::error::QueryError;

/// Read-only access to the content types model options query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Runs manager filters, then `query.filters`, then ordering, then the limit.
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, QueryError>;
    async fn schema(&self, content_type: &str) -> Option<ContentTypeSchema>;
}
