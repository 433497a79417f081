//! In-memory adapters, used for development and tests

pub mod menu_repo;
pub mod record_store;
pub mod breadcrumb_store;

pub use menu_repo::InMemoryMenuRepository;
pub use record_store::InMemoryRecordStore;
pub use breadcrumb_store::InMemoryBreadcrumbStore;
