// ============================================================================
// Sitenav Infrastructure - Fixture Loader
// File: crates/sitenav-infrastructure/src/fixtures.rs
// Description: Loads routes, breadcrumb policies, menus and records from JSON
// ============================================================================

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use sitenav_core::domain::{
    BreadcrumbPolicy, BreadcrumbRegistry, ContentTypeSchema, CrumbContext, MenuGroup, MenuOptionRecord, OptionType,
    Setting, UrlKwargs,
};
use sitenav_core::repositories::{MenuRepository, RecordStore};
use sitenav_core::services::MenuAdminService;

use crate::memory::InMemoryRecordStore;
use crate::routing::PatternRouter;

#[derive(Debug, Clone, Deserialize)]
pub struct RouteFixture {
    /// Unnamed routes resolve but cannot be reversed.
    #[serde(default)]
    pub name: Option<String>,
    pub view: String,
    pub pattern: String,
}

/// Breadcrumb policy of one view. `{arg}` in the title is replaced with
/// the matching URL argument.
#[derive(Debug, Clone, Deserialize)]
pub struct CrumbFixture {
    pub view: String,
    pub title: String,
    #[serde(default)]
    pub reset: bool,
}

fn fill_title(template: &str, kwargs: &UrlKwargs) -> String {
    kwargs.iter().fold(template.to_string(), |title, (key, value)| {
        title.replace(&format!("{{{}}}", key), value)
    })
}

impl CrumbFixture {
    pub fn policy(&self) -> BreadcrumbPolicy {
        let title = if self.title.contains('{') {
            let template = self.title.clone();
            Setting::computed(move |ctx: &CrumbContext| fill_title(&template, &ctx.kwargs))
        } else {
            Setting::Fixed(self.title.clone())
        };
        BreadcrumbPolicy::new(title, Setting::Fixed(self.reset), Setting::Fixed(true))
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentTypeFixture {
    pub schema: ContentTypeSchema,
    /// Backing table for the PostgreSQL store; defaults to the type name.
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub rows: Vec<Value>,
}

impl ContentTypeFixture {
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.schema.name)
    }
}

/// Contents of a fixture file. Options are written in file order, so a
/// parent must be listed before its children.
#[derive(Debug, Default, Deserialize)]
pub struct MenuFixture {
    #[serde(default)]
    pub routes: Vec<RouteFixture>,
    #[serde(default)]
    pub breadcrumbs: Vec<CrumbFixture>,
    #[serde(default)]
    pub groups: Vec<MenuGroup>,
    #[serde(default)]
    pub options: Vec<MenuOptionRecord>,
    #[serde(default)]
    pub content_types: Vec<ContentTypeFixture>,
}

impl MenuFixture {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Invalid fixture JSON")
    }

    pub fn register_routes(&self, router: &PatternRouter) -> anyhow::Result<()> {
        for route in &self.routes {
            let added = match &route.name {
                Some(name) => router.add(name, &route.view, &route.pattern),
                None => router.add_unnamed(&route.view, &route.pattern),
            };
            added.with_context(|| format!("Invalid route for view '{}'", route.view))?;
        }
        info!("Registered {} routes", self.routes.len());
        Ok(())
    }

    pub fn breadcrumb_registry(&self) -> BreadcrumbRegistry {
        let mut registry = BreadcrumbRegistry::new();
        for crumb in &self.breadcrumbs {
            registry.register(crumb.view.clone(), crumb.policy());
        }
        registry
    }

    /// Creates groups, then saves every option through the admin service.
    pub async fn seed_menus<M: MenuRepository + ?Sized>(&self, admin: &MenuAdminService<M>) -> anyhow::Result<()> {
        for group in &self.groups {
            admin
                .create_group(group.clone())
                .await
                .with_context(|| format!("Failed to create menu group '{}'", group.name))?;
        }
        for record in &self.options {
            admin
                .save_option(record.clone())
                .await
                .with_context(|| format!("Failed to save menu option {} '{}'", record.id, record.name))?;
        }
        info!("Seeded {} menu groups and {} options", self.groups.len(), self.options.len());
        Ok(())
    }

    /// Fails when a model option names a content type `store` does not know.
    pub async fn check_content_types<S: RecordStore + ?Sized>(&self, store: &S) -> anyhow::Result<()> {
        let models = self.options.iter().filter(|r| r.option_type == OptionType::Model);
        for record in models {
            let Some(name) = record.content_type.as_deref() else {
                continue;
            };
            if store.schema(name).await.is_none() {
                anyhow::bail!(
                    "Menu option {} '{}' uses unknown content type '{}'",
                    record.id,
                    record.name,
                    name
                );
            }
        }
        Ok(())
    }

    /// Registers content types and their rows in an in-memory store.
    pub fn seed_records(&self, store: &InMemoryRecordStore) -> anyhow::Result<()> {
        for content in &self.content_types {
            store.register(content.schema.clone());
            for row in &content.rows {
                store
                    .insert(&content.schema.name, row.clone())
                    .with_context(|| format!("Failed to insert {} row", content.schema.name))?;
            }
        }
        Ok(())
    }
}

pub fn load_fixture(path: impl AsRef<Path>) -> anyhow::Result<MenuFixture> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("Cannot read fixture {}", path.display()))?;
    MenuFixture::from_json(&text)
}
