// ============================================================================
// Sitenav Core - Record Query Service
// File: crates/sitenav-core/src/services/query_service.rs
// Description: Builds and runs the queries behind model-driven options
// ============================================================================

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::filter::{interpolate, parse_clauses, parse_order_by};
use crate::domain::{FilterClause, MenuOption, ModelTarget, Record, RecordQuery, UrlKwargs};
use crate::error::QueryError;
use crate::repositories::RecordStore;

/// Runs model option queries, absorbing every failure into "no rows".
pub struct RecordQueryService<S: RecordStore + ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> Clone for RecordQueryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore + ?Sized> RecordQueryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Template filters, then `extra`, then ordering and the row limit.
    pub fn build_query(
        model: &ModelTarget,
        kwargs: &UrlKwargs,
        extra: &[FilterClause],
    ) -> Result<RecordQuery, QueryError> {
        // 1. Interpolate the stored template with the URL arguments
        let mut filters = if model.query.trim().is_empty() {
            Vec::new()
        } else {
            parse_clauses(&interpolate(&model.query, kwargs)?)?
        };

        // 2. Caller supplied clauses come after the template's
        filters.extend_from_slice(extra);

        Ok(RecordQuery {
            content_type: model.content_type.clone(),
            manager: model.manager.clone(),
            filters,
            order_by: parse_order_by(&model.order_by),
            // A zero limit means unlimited
            limit: model.result_limit.filter(|l| *l > 0).map(|l| l as usize),
        })
    }

    /// Rows for a model option. Non-model options have none.
    pub async fn fetch(&self, option: &MenuOption, kwargs: &UrlKwargs, extra: &[FilterClause]) -> Vec<Record> {
        let model = match option.model_target() {
            Some(model) => model,
            None => return Vec::new(),
        };

        let result = match Self::build_query(model, kwargs, extra) {
            Ok(query) => self.store.query(&query).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(rows) => rows,
            Err(e) if e.is_unexpected() => {
                error!(option_id = option.id, content_type = %model.content_type, "Menu query failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                debug!(option_id = option.id, content_type = %model.content_type, "Menu query yields no rows: {}", e);
                Vec::new()
            }
        }
    }
}
