//! # Sitenav Core - Domain Module
//! 
//! Domain entities for menus, requests, records and breadcrumbs.

pub mod menu_group;
pub mod menu_option;
pub mod user;
pub mod request;
pub mod record;
pub mod filter;
pub mod hierarchy;
pub mod breadcrumb;

// Re-export all entities and enums
pub use menu_group::{MenuGroup, GroupId};
pub use menu_option::{
    MenuOption, MenuOptionRecord, MenuTarget, ModelTarget, OptionId, OptionType, SiteId,
};
pub use user::{Permission, RequestUser};
pub use request::{CurrentUrl, MenuRequest, UrlKwargs};
pub use record::{ContentTypeSchema, Record, RecordQuery};
pub use filter::{FilterClause, Lookup, OrderKey};
pub use hierarchy::{MenuHierarchy, MenuNode};
pub use breadcrumb::{
    BreadcrumbPolicy, BreadcrumbRegistry, BreadcrumbTrail, Crumb, CrumbContext, Setting,
};
