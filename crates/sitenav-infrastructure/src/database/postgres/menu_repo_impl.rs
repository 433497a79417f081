// ============================================================================
// Sitenav Infrastructure - PostgreSQL Menu Repository
// File: crates/sitenav-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use sitenav_core::domain::{
    GroupId, MenuGroup, MenuOption, MenuOptionRecord, OptionId, OptionType, Permission,
};
use sitenav_core::error::DomainError;
use sitenav_core::repositories::MenuRepository;

const OPTION_COLUMNS: &str = r#"
    id, menu_group_id, parent_id, name, option_type, alt_text, notes, ordering,
    show_to_anonymous, show_to_authenticated, show_to_staff, permissions, sites,
    url, url_name, content_type, manager, query, url_id, model_id, order_by, result_limit,
    created_at, modified_at
"#;

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuGroupRow {
    pub id: i64,
    pub name: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<MenuGroupRow> for MenuGroup {
    fn from(row: MenuGroupRow) -> Self {
        MenuGroup {
            id: row.id,
            name: row.name,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MenuOptionRow {
    pub id: i64,
    pub menu_group_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub option_type: String,
    pub alt_text: String,
    pub notes: String,
    pub ordering: i32,
    pub show_to_anonymous: bool,
    pub show_to_authenticated: bool,
    pub show_to_staff: bool,
    pub permissions: Vec<String>,
    pub sites: Vec<i64>,
    pub url: Option<String>,
    pub url_name: Option<String>,
    pub content_type: Option<String>,
    pub manager: Option<String>,
    pub query: String,
    pub url_id: Option<String>,
    pub model_id: Option<String>,
    pub order_by: String,
    pub result_limit: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<MenuOptionRow> for MenuOption {
    type Error = DomainError;

    fn try_from(row: MenuOptionRow) -> Result<Self, Self::Error> {
        let option_type = OptionType::from_str(&row.option_type)
            .ok_or_else(|| DomainError::DatabaseError(format!("Unknown option type '{}'", row.option_type)))?;

        MenuOption::try_from(MenuOptionRecord {
            id: row.id,
            menu_group_id: row.menu_group_id,
            parent_id: row.parent_id,
            name: row.name,
            option_type,
            alt_text: row.alt_text,
            notes: row.notes,
            ordering: row.ordering,
            show_to_anonymous: row.show_to_anonymous,
            show_to_authenticated: row.show_to_authenticated,
            show_to_staff: row.show_to_staff,
            permissions: row.permissions.into_iter().map(Permission::new).collect(),
            sites: row.sites,
            url: row.url,
            url_name: row.url_name,
            content_type: row.content_type,
            manager: row.manager,
            query: row.query,
            url_id: row.url_id,
            model_id: row.model_id,
            order_by: row.order_by,
            result_limit: row.result_limit.and_then(|l| u32::try_from(l).ok()),
            created_at: Some(row.created_at),
            modified_at: row.modified_at,
        })
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn find_group_by_id(&self, id: GroupId) -> Result<Option<MenuGroup>, DomainError> {
        let row: Option<MenuGroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, notes, created_at
            FROM menu_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding menu group by id"))?;

        Ok(row.map(Into::into))
    }

    async fn find_group_by_name(&self, name: &str) -> Result<Option<MenuGroup>, DomainError> {
        let row: Option<MenuGroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, notes, created_at
            FROM menu_groups
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding menu group by name"))?;

        Ok(row.map(Into::into))
    }

    async fn create_group(&self, group: &MenuGroup) -> Result<MenuGroup, DomainError> {
        let explicit_id = (group.id > 0).then_some(group.id);
        let row: MenuGroupRow = sqlx::query_as(
            r#"
            INSERT INTO menu_groups (id, name, notes, created_at)
            VALUES (COALESCE($1, nextval('menu_groups_id_seq')), $2, $3, $4)
            RETURNING id, name, notes, created_at
            "#,
        )
        .bind(explicit_id)
        .bind(&group.name)
        .bind(&group.notes)
        .bind(group.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("creating menu group"))?;

        if explicit_id.is_some() {
            sqlx::query("SELECT setval('menu_groups_id_seq', GREATEST(MAX(id), 1)) FROM menu_groups")
                .execute(&self.pool)
                .await
                .map_err(db_error("advancing menu group sequence"))?;
        }

        info!("Menu group created: {} ({})", row.name, row.id);
        Ok(row.into())
    }

    async fn find_option(&self, id: OptionId) -> Result<Option<MenuOption>, DomainError> {
        let sql = format!("SELECT {} FROM menu_options WHERE id = $1", OPTION_COLUMNS);
        let row: Option<MenuOptionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding menu option"))?;

        row.map(MenuOption::try_from).transpose()
    }

    async fn list_options(&self, group_id: GroupId) -> Result<Vec<MenuOption>, DomainError> {
        let sql = format!(
            "SELECT {} FROM menu_options WHERE menu_group_id = $1 ORDER BY ordering, id",
            OPTION_COLUMNS
        );
        let rows: Vec<MenuOptionRow> = sqlx::query_as(&sql)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("listing menu options"))?;

        rows.into_iter().map(MenuOption::try_from).collect()
    }

    async fn save_option(&self, option: &MenuOption) -> Result<MenuOption, DomainError> {
        let record = option.to_record();
        let explicit_id = (record.id > 0).then_some(record.id);
        let permissions: Vec<String> = record.permissions.iter().map(|p| p.as_str().to_string()).collect();

        let sql = format!(
            r#"
            INSERT INTO menu_options (
                id, menu_group_id, parent_id, name, option_type, alt_text, notes, ordering,
                show_to_anonymous, show_to_authenticated, show_to_staff, permissions, sites,
                url, url_name, content_type, manager, query, url_id, model_id, order_by, result_limit,
                created_at, modified_at
            )
            VALUES (
                COALESCE($1, nextval('menu_options_id_seq')), $2, $3, $4, $5, $6, $7, $8,
                $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22,
                $23, $24
            )
            ON CONFLICT (id) DO UPDATE SET
                menu_group_id = EXCLUDED.menu_group_id,
                parent_id = EXCLUDED.parent_id,
                name = EXCLUDED.name,
                option_type = EXCLUDED.option_type,
                alt_text = EXCLUDED.alt_text,
                notes = EXCLUDED.notes,
                ordering = EXCLUDED.ordering,
                show_to_anonymous = EXCLUDED.show_to_anonymous,
                show_to_authenticated = EXCLUDED.show_to_authenticated,
                show_to_staff = EXCLUDED.show_to_staff,
                permissions = EXCLUDED.permissions,
                sites = EXCLUDED.sites,
                url = EXCLUDED.url,
                url_name = EXCLUDED.url_name,
                content_type = EXCLUDED.content_type,
                manager = EXCLUDED.manager,
                query = EXCLUDED.query,
                url_id = EXCLUDED.url_id,
                model_id = EXCLUDED.model_id,
                order_by = EXCLUDED.order_by,
                result_limit = EXCLUDED.result_limit,
                modified_at = EXCLUDED.modified_at
            RETURNING {}
            "#,
            OPTION_COLUMNS
        );

        let row: MenuOptionRow = sqlx::query_as(&sql)
            .bind(explicit_id)
            .bind(record.menu_group_id)
            .bind(record.parent_id)
            .bind(&record.name)
            .bind(record.option_type.as_str())
            .bind(&record.alt_text)
            .bind(&record.notes)
            .bind(record.ordering)
            .bind(record.show_to_anonymous)
            .bind(record.show_to_authenticated)
            .bind(record.show_to_staff)
            .bind(&permissions)
            .bind(&record.sites)
            .bind(&record.url)
            .bind(&record.url_name)
            .bind(&record.content_type)
            .bind(&record.manager)
            .bind(&record.query)
            .bind(&record.url_id)
            .bind(&record.model_id)
            .bind(&record.order_by)
            .bind(record.result_limit.and_then(|l| i32::try_from(l).ok()))
            .bind(record.created_at.unwrap_or_else(Utc::now))
            .bind(record.modified_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("saving menu option"))?;

        if explicit_id.is_some() {
            sqlx::query("SELECT setval('menu_options_id_seq', GREATEST(MAX(id), 1)) FROM menu_options")
                .execute(&self.pool)
                .await
                .map_err(db_error("advancing menu option sequence"))?;
        }

        MenuOption::try_from(row)
    }
}
