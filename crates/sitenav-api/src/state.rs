use std::sync::Arc;

use sitenav_core::repositories::{BreadcrumbStore, MenuRepository, RecordStore};
use sitenav_core::routing::UrlResolver;
use sitenav_core::services::{BreadcrumbService, MenuService};
use sitenav_shared::config::AppConfig;

use crate::auth::JwtManager;

pub type SharedMenuService = MenuService<dyn MenuRepository, dyn RecordStore>;
pub type SharedBreadcrumbService = BreadcrumbService<dyn BreadcrumbStore>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub menus: Arc<SharedMenuService>,
    pub breadcrumbs: Arc<SharedBreadcrumbService>,
    pub urls: Arc<dyn UrlResolver>,
    pub route_count: usize,
    pub jwt: Arc<JwtManager>,
    pub config: AppConfig,
}
