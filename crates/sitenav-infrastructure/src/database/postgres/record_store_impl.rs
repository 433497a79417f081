// ============================================================================
// Sitenav Infrastructure - PostgreSQL Record Store
// File: crates/sitenav-infrastructure/src/database/postgres/record_store_impl.rs
// Description: Runs model option queries against registered tables
// ============================================================================

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{error, info, warn};

use sitenav_core::domain::{ContentTypeSchema, FilterClause, Lookup, Record, RecordQuery};
use sitenav_core::error::QueryError;
use sitenav_core::repositories::RecordStore;

#[derive(Debug, FromRow)]
struct ContentTypeRow {
    pub name: String,
    pub table_name: String,
    pub label_field: String,
    pub fields: Vec<String>,
    pub managers: Json<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
struct ContentTable {
    schema: ContentTypeSchema,
    table: String,
}

/// Record store over tables listed in `content_types`.
///
/// Table names must be plain identifiers and every field a query touches
/// must be listed in the schema; values are always bound.
pub struct PgRecordStore {
    pool: PgPool,
    tables: RwLock<HashMap<String, ContentTable>>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Reloads content type definitions. Rows naming invalid tables are
    /// skipped with a warning.
    pub async fn refresh(&self) -> Result<usize, sqlx::Error> {
        let rows: Vec<ContentTypeRow> = sqlx::query_as(
            r#"
            SELECT name, table_name, label_field, fields, managers
            FROM content_types
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = HashMap::new();
        for row in rows {
            if !is_identifier(&row.table_name) {
                warn!("Skipping content type {}: invalid table name '{}'", row.name, row.table_name);
                continue;
            }
            let schema = ContentTypeSchema {
                name: row.name.clone(),
                label_field: row.label_field,
                fields: row.fields,
                managers: row.managers.0,
            };
            tables.insert(row.name, ContentTable { schema, table: row.table_name });
        }

        let count = tables.len();
        *self.tables.write() = tables;
        info!("Loaded {} content types", count);
        Ok(count)
    }

    /// Registers a content type backed by `table`.
    pub async fn register(&self, schema: &ContentTypeSchema, table: &str) -> Result<(), QueryError> {
        if !is_identifier(table) {
            return Err(QueryError::Store(format!("invalid table name '{}'", table)));
        }
        sqlx::query(
            r#"
            INSERT INTO content_types (name, table_name, label_field, fields, managers)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE SET
                table_name = EXCLUDED.table_name,
                label_field = EXCLUDED.label_field,
                fields = EXCLUDED.fields,
                managers = EXCLUDED.managers
            "#,
        )
        .bind(&schema.name)
        .bind(table)
        .bind(&schema.label_field)
        .bind(&schema.fields)
        .bind(Json(&schema.managers))
        .execute(&self.pool)
        .await
        .map_err(|e| QueryError::Store(e.to_string()))?;

        self.tables.write().insert(
            schema.name.clone(),
            ContentTable {
                schema: schema.clone(),
                table: table.to_string(),
            },
        );
        Ok(())
    }

    fn table(&self, content_type: &str) -> Result<ContentTable, QueryError> {
        self.tables
            .read()
            .get(content_type)
            .cloned()
            .ok_or_else(|| QueryError::UnknownContentType(content_type.to_string()))
    }
}

/// Appends `<condition>` for one clause. Field names were checked against
/// the schema; the path and value are bound.
fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, clause: &FilterClause) {
    let path = clause.path.clone();
    let value = clause.value.clone();
    let numeric = value.parse::<f64>().ok();

    match clause.lookup {
        Lookup::Exact => {
            builder.push("(to_jsonb(t) #>> ");
            builder.push_bind(path.clone());
            builder.push(" = ");
            builder.push_bind(value.clone());
            builder.push(" OR (jsonb_typeof(to_jsonb(t) #> ");
            builder.push_bind(path);
            builder.push(") = 'boolean' AND to_jsonb(t) #>> ");
            builder.push_bind(clause.path.clone());
            builder.push(" = lower(");
            builder.push_bind(match value.as_str() {
                "1" => "true".to_string(),
                "0" => "false".to_string(),
                _ => value,
            });
            builder.push("))");
            // Numbers compare by value, so "02" finds 2
            if let Some(number) = numeric {
                builder.push(" OR (jsonb_typeof(to_jsonb(t) #> ");
                builder.push_bind(clause.path.clone());
                builder.push(") = 'number' AND (to_jsonb(t) #>> ");
                builder.push_bind(clause.path.clone());
                builder.push(")::float8 = ");
                builder.push_bind(number);
                builder.push(")");
            }
            builder.push(")");
        }
        Lookup::IExact => {
            builder.push("lower(to_jsonb(t) #>> ");
            builder.push_bind(path);
            builder.push(") = lower(");
            builder.push_bind(value);
            builder.push(")");
        }
        Lookup::Contains | Lookup::IContains | Lookup::StartsWith => {
            let operator = if clause.lookup == Lookup::IContains { " ILIKE " } else { " LIKE " };
            let pattern = match clause.lookup {
                Lookup::StartsWith => format!("{}%", escape_like(&value)),
                _ => format!("%{}%", escape_like(&value)),
            };
            builder.push("(to_jsonb(t) #>> ");
            builder.push_bind(path);
            builder.push(")");
            builder.push(operator);
            builder.push_bind(pattern);
        }
        Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte => {
            let operator = match clause.lookup {
                Lookup::Gt => " > ",
                Lookup::Gte => " >= ",
                Lookup::Lt => " < ",
                _ => " <= ",
            };
            match numeric {
                Some(number) => {
                    builder.push("(jsonb_typeof(to_jsonb(t) #> ");
                    builder.push_bind(path.clone());
                    builder.push(") = 'number' AND (to_jsonb(t) #>> ");
                    builder.push_bind(path);
                    builder.push(")::float8");
                    builder.push(operator);
                    builder.push_bind(number);
                    builder.push(")");
                }
                None => {
                    builder.push("(to_jsonb(t) #>> ");
                    builder.push_bind(path);
                    builder.push(")");
                    builder.push(operator);
                    builder.push_bind(value);
                }
            }
        }
    }
}

fn build_select(table: &ContentTable, query: &RecordQuery) -> Result<QueryBuilder<'static, Postgres>, QueryError> {
    let filters = query.effective_filters(&table.schema)?;

    let mut builder = QueryBuilder::new("SELECT to_jsonb(t) AS fields FROM \"");
    builder.push(&table.table);
    builder.push("\" t WHERE TRUE");

    for clause in &filters {
        builder.push(" AND ");
        push_clause(&mut builder, clause);
    }

    if !query.order_by.is_empty() {
        builder.push(" ORDER BY ");
        let mut keys = builder.separated(", ");
        for key in &query.order_by {
            keys.push("to_jsonb(t) #> ");
            keys.push_bind_unseparated(key.path.clone());
            keys.push_unseparated(if key.descending { " DESC NULLS LAST" } else { " ASC NULLS FIRST" });
        }
    }

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }

    Ok(builder)
}

#[derive(FromRow)]
struct RecordRow {
    fields: Json<Value>,
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, QueryError> {
        let table = self.table(&query.content_type)?;
        let mut builder = build_select(&table, query)?;

        let rows: Vec<RecordRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error querying {}: {}", table.table, e);
                QueryError::Store(e.to_string())
            })?;

        Ok(rows.into_iter().map(|row| table.schema.record_from(row.fields.0)).collect())
    }

    async fn schema(&self, content_type: &str) -> Option<ContentTypeSchema> {
        self.tables.read().get(content_type).map(|t| t.schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitenav_core::domain::filter::{parse_clauses, parse_order_by};

    fn table() -> ContentTable {
        ContentTable {
            schema: ContentTypeSchema {
                name: "article".to_string(),
                label_field: "title".to_string(),
                fields: vec!["id".to_string(), "title".to_string(), "category".to_string()],
                managers: BTreeMap::from([("live".to_string(), "category__slug=news".to_string())]),
            },
            table: "blog_article".to_string(),
        }
    }

    fn query(manager: &str, filters: &str, order_by: &str, limit: Option<usize>) -> RecordQuery {
        RecordQuery {
            content_type: "article".to_string(),
            manager: manager.to_string(),
            filters: parse_clauses(filters).unwrap(),
            order_by: parse_order_by(order_by),
            limit,
        }
    }

    #[test]
    fn test_select_binds_every_value() {
        let builder = build_select(&table(), &query("live", "title__icontains=100%", "-id", Some(5))).unwrap();
        let sql = builder.sql();
        assert!(sql.starts_with("SELECT to_jsonb(t) AS fields FROM \"blog_article\" t WHERE TRUE AND "));
        assert!(sql.contains(" ILIKE $"));
        assert!(sql.contains(" DESC NULLS LAST"));
        assert!(sql.contains(" LIMIT $"));
        assert!(!sql.contains("100%"));
        assert!(!sql.contains("news"));
    }

    #[test]
    fn test_exact_match_compares_numbers_by_value() {
        let builder = build_select(&table(), &query("objects", "id=02", "", None)).unwrap();
        let sql = builder.sql();
        assert!(sql.contains("(to_jsonb(t) #>> $1 = $2 OR "));
        assert!(sql.contains(" OR (jsonb_typeof(to_jsonb(t) #> $6) = 'number' AND (to_jsonb(t) #>> $7)::float8 = $8))"));
        assert!(!sql.contains("02"));

        let builder = build_select(&table(), &query("objects", "title=hello", "", None)).unwrap();
        assert!(!builder.sql().contains("::float8"));
    }

    #[test]
    fn test_unknown_fields_never_reach_sql() {
        let err = build_select(&table(), &query("objects", "password=x", "", None)).err();
        assert!(matches!(err, Some(QueryError::UnknownField { .. })));

        let err = build_select(&table(), &query("objects", "", "secret", None)).err();
        assert!(matches!(err, Some(QueryError::UnknownField { .. })));

        let err = build_select(&table(), &query("drafts", "", "", None)).err();
        assert!(matches!(err, Some(QueryError::UnknownManager { .. })));
    }

    #[test]
    fn test_identifier_and_like_escaping() {
        assert!(is_identifier("blog_article"));
        assert!(!is_identifier("blog\"; DROP TABLE x; --"));
        assert!(!is_identifier("1table"));
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
