//! Breadcrumb trails keyed by session id

use async_trait::async_trait;
use dashmap::DashMap;

use sitenav_core::domain::BreadcrumbTrail;
use sitenav_core::error::DomainError;
use sitenav_core::repositories::BreadcrumbStore;

#[derive(Default)]
pub struct InMemoryBreadcrumbStore {
    sessions: DashMap<String, BreadcrumbTrail>,
}

impl InMemoryBreadcrumbStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl BreadcrumbStore for InMemoryBreadcrumbStore {
    async fn load(&self, session_id: &str) -> Result<Option<BreadcrumbTrail>, DomainError> {
        Ok(self.sessions.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn store(&self, session_id: &str, trail: &BreadcrumbTrail) -> Result<(), DomainError> {
        self.sessions.insert(session_id.to_string(), trail.clone());
        Ok(())
    }
}
