//! PostgreSQL repository implementations

pub mod menu_repo_impl;
pub mod record_store_impl;
pub mod breadcrumb_store_impl;

pub use menu_repo_impl::PgMenuRepository;
pub use record_store_impl::PgRecordStore;
pub use breadcrumb_store_impl::PgBreadcrumbStore;
