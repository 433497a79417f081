//! Domain services (business logic)

pub mod visibility;
pub mod query_service;
pub mod link_resolver;
pub mod url_matcher;
pub mod hierarchy_builder;
pub mod renderer;
pub mod menu_service;
pub mod menu_admin_service;
pub mod breadcrumb_service;

pub use visibility::{filter_for_site, filter_visible, is_visible};
pub use query_service::RecordQueryService;
pub use link_resolver::{LinkEntry, LinkMode, LinkResolver};
pub use url_matcher::UrlMatcher;
pub use hierarchy_builder::{assemble_hierarchy, HierarchyBuilder};
pub use renderer::{render_menu, EntryMap, MenuTags};
pub use menu_service::{GroupRef, MenuService};
pub use menu_admin_service::MenuAdminService;
pub use breadcrumb_service::{BreadcrumbService, RootUrl};
