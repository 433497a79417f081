//! # Sitenav Infrastructure
//! 
//! Storage adapters (in-memory and PostgreSQL), the pattern router and the
//! JSON fixture loader.

pub mod memory;
pub mod routing;
pub mod database;
pub mod fixtures;

#[cfg(test)]
mod test;

pub use memory::{InMemoryBreadcrumbStore, InMemoryMenuRepository, InMemoryRecordStore};
pub use routing::{PatternRouter, RouteError};
pub use database::{create_pool, run_migrations, PgBreadcrumbStore, PgMenuRepository, PgRecordStore};
pub use fixtures::{load_fixture, ContentTypeFixture, CrumbFixture, MenuFixture, RouteFixture};
