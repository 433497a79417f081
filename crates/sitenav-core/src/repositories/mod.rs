//! Repository traits (ports)

pub mod menu_repository;
pub mod record_store;
pub mod breadcrumb_store;

pub use menu_repository::MenuRepository;
pub use record_store::RecordStore;
pub use breadcrumb_store::BreadcrumbStore;

#[cfg(test)]
pub use menu_repository::MockMenuRepository;
#[cfg(test)]
pub use record_store::MockRecordStore;
#[cfg(test)]
pub use breadcrumb_store::MockBreadcrumbStore;
