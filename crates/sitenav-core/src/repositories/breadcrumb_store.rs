//! Breadcrumb session storage trait (port)

use async_trait::async_trait;

use crate::domain::BreadcrumbTrail;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BreadcrumbStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<BreadcrumbTrail>, DomainError>;
    async fn store(&self, session_id: &str, trail: &BreadcrumbTrail) -> Result<(), DomainError>;
}
