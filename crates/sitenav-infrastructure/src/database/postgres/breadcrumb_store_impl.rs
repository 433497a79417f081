//! Breadcrumb trails stored as JSONB per session

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::error;

use sitenav_core::domain::BreadcrumbTrail;
use sitenav_core::error::DomainError;
use sitenav_core::repositories::BreadcrumbStore;

pub struct PgBreadcrumbStore {
    pool: PgPool,
}

impl PgBreadcrumbStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BreadcrumbStore for PgBreadcrumbStore {
    async fn load(&self, session_id: &str) -> Result<Option<BreadcrumbTrail>, DomainError> {
        let row: Option<(Json<BreadcrumbTrail>,)> =
            sqlx::query_as("SELECT trail FROM breadcrumb_sessions WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e: sqlx::Error| {
                    error!("Database error loading breadcrumbs: {}", e);
                    DomainError::DatabaseError(e.to_string())
                })?;

        Ok(row.map(|(trail,)| trail.0))
    }

    async fn store(&self, session_id: &str, trail: &BreadcrumbTrail) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO breadcrumb_sessions (session_id, trail, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (session_id) DO UPDATE SET trail = EXCLUDED.trail, updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(Json(trail))
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error storing breadcrumbs: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
