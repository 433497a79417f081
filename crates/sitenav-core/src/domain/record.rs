//! Records returned by model-driven menu queries

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sitenav_shared::constants::DEFAULT_MANAGER;

use super::filter::{compare_values, parse_clauses, value_text, FilterClause, OrderKey};
use crate::error::QueryError;

/// A queried row: a human readable label plus its raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    pub fields: Map<String, Value>,
}

impl Record {
    /// Builds a record; non-object `fields` become an empty field map.
    pub fn new(label: String, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { label, fields }
    }

    /// Follows a field path into nested objects.
    pub fn field(&self, path: &[String]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.fields.get(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Text form of a top-level or `__` separated field.
    pub fn field_text(&self, name: &str) -> Option<String> {
        let path: Vec<String> = name.split("__").map(str::to_string).collect();
        self.field(&path).and_then(value_text)
    }
}

/// Describes a queryable record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeSchema {
    pub name: String,
    /// Field whose value is the record's display label.
    pub label_field: String,
    pub fields: Vec<String>,
    /// Named entry points, each a fixed filter expression applied first.
    /// `objects` exists implicitly and has no filter.
    #[serde(default)]
    pub managers: BTreeMap<String, String>,
}

impl ContentTypeSchema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    fn require_field(&self, name: &str) -> Result<(), QueryError> {
        if self.has_field(name) {
            Ok(())
        } else {
            Err(QueryError::UnknownField {
                content_type: self.name.clone(),
                field: name.to_string(),
            })
        }
    }

    pub fn manager_filters(&self, manager: &str) -> Result<Vec<FilterClause>, QueryError> {
        match self.managers.get(manager) {
            Some(expression) => parse_clauses(expression),
            None if manager == DEFAULT_MANAGER => Ok(Vec::new()),
            None => Err(QueryError::UnknownManager {
                content_type: self.name.clone(),
                manager: manager.to_string(),
            }),
        }
    }

    /// Builds a record from raw fields, labelling it with `label_field`.
    pub fn record_from(&self, fields: Value) -> Record {
        let label = fields
            .get(&self.label_field)
            .and_then(value_text)
            .unwrap_or_else(|| format!("{} object", self.name));
        Record::new(label, fields)
    }
}

/// A fully resolved query against one content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub content_type: String,
    pub manager: String,
    pub filters: Vec<FilterClause>,
    pub order_by: Vec<OrderKey>,
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Manager filters followed by the query's own, field-checked.
    pub fn effective_filters(&self, schema: &ContentTypeSchema) -> Result<Vec<FilterClause>, QueryError> {
        let mut filters = schema.manager_filters(&self.manager)?;
        filters.extend(self.filters.iter().cloned());
        for clause in &filters {
            schema.require_field(clause.field())?;
        }
        for key in &self.order_by {
            schema.require_field(key.field())?;
        }
        Ok(filters)
    }

    /// Filters, orders and limits records held in memory.
    pub fn apply<'a, I>(&self, schema: &ContentTypeSchema, records: I) -> Result<Vec<Record>, QueryError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let filters = self.effective_filters(schema)?;

        let mut rows: Vec<Record> = records
            .into_iter()
            .filter(|record| filters.iter().all(|clause| clause.matches(record)))
            .cloned()
            .collect();

        if !self.order_by.is_empty() {
            rows.sort_by(|a, b| {
                self.order_by
                    .iter()
                    .map(|key| {
                        let ord = compare_values(a.field(&key.path), b.field(&key.path));
                        if key.descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| ord.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}
