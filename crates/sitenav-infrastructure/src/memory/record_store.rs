//! Queryable records held in process memory

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use sitenav_core::domain::{ContentTypeSchema, Record, RecordQuery};
use sitenav_core::error::QueryError;
use sitenav_core::repositories::RecordStore;

struct ContentTable {
    schema: ContentTypeSchema,
    rows: Vec<Record>,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<String, ContentTable>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a content type, replacing any earlier one and its rows.
    pub fn register(&self, schema: ContentTypeSchema) {
        let name = schema.name.clone();
        self.tables.write().insert(name, ContentTable { schema, rows: Vec::new() });
    }

    /// Adds a row to a registered content type.
    pub fn insert(&self, content_type: &str, fields: Value) -> Result<(), QueryError> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(content_type)
            .ok_or_else(|| QueryError::UnknownContentType(content_type.to_string()))?;
        let record = table.schema.record_from(fields);
        table.rows.push(record);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, QueryError> {
        let tables = self.tables.read();
        let table = tables
            .get(&query.content_type)
            .ok_or_else(|| QueryError::UnknownContentType(query.content_type.clone()))?;
        query.apply(&table.schema, &table.rows)
    }

    async fn schema(&self, content_type: &str) -> Option<ContentTypeSchema> {
        self.tables.read().get(content_type).map(|t| t.schema.clone())
    }
}
