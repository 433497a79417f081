// ============================================================================
// Sitenav Core - Menu Service
// File: crates/sitenav-core/src/services/menu_service.rs
// Description: Entry point for building and rendering a group's menu
// ============================================================================

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{MenuGroup, MenuHierarchy, MenuRequest, SiteId};
use crate::error::DomainError;
use crate::repositories::{MenuRepository, RecordStore};
use crate::routing::UrlResolver;
use crate::services::hierarchy_builder::HierarchyBuilder;
use crate::services::link_resolver::{LinkMode, LinkResolver};
use crate::services::query_service::RecordQueryService;
use crate::services::renderer::{render_menu, EntryMap, MenuTags};
use crate::services::url_matcher::UrlMatcher;

/// A group given directly or by name.
#[derive(Debug, Clone, Copy)]
pub enum GroupRef<'a> {
    Group(&'a MenuGroup),
    Name(&'a str),
}

impl<'a> From<&'a MenuGroup> for GroupRef<'a> {
    fn from(group: &'a MenuGroup) -> Self {
        GroupRef::Group(group)
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> Self {
        GroupRef::Name(name)
    }
}

/// Menu service for rendering navigation menus
pub struct MenuService<M: MenuRepository + ?Sized, S: RecordStore + ?Sized> {
    menu_repo: Arc<M>,
    links: Arc<LinkResolver<S>>,
    builder: HierarchyBuilder<S>,
}

impl<M: MenuRepository + ?Sized, S: RecordStore + ?Sized> MenuService<M, S> {
    pub fn new(
        menu_repo: Arc<M>,
        record_store: Arc<S>,
        urls: Arc<dyn UrlResolver>,
        site_id: Option<SiteId>,
    ) -> Self {
        let queries = RecordQueryService::new(record_store);
        let links = Arc::new(LinkResolver::new(queries.clone(), Arc::clone(&urls)));
        let builder = HierarchyBuilder::new(Arc::clone(&links), UrlMatcher::new(queries), urls, site_id);
        Self {
            menu_repo,
            links,
            builder,
        }
    }

    /// Looks a group up; a name matching no group yields `None`.
    pub async fn find_group(&self, group: GroupRef<'_>) -> Result<Option<MenuGroup>, DomainError> {
        match group {
            GroupRef::Group(group) => Ok(Some(group.clone())),
            GroupRef::Name(name) => self.menu_repo.find_group_by_name(name).await,
        }
    }

    /// Builds the hierarchy of `group` for `request`.
    pub async fn generate_hierarchy(
        &self,
        group: &MenuGroup,
        request: &MenuRequest,
    ) -> Result<MenuHierarchy, DomainError> {
        let options = self.menu_repo.list_options(group.id).await?;
        debug!(group = %group.name, options = options.len(), "Building menu hierarchy");
        Ok(self.builder.build(options, request).await)
    }

    /// Resolves link entries for every displayable option.
    ///
    /// The option matching the current URL is resolved in non-link mode.
    pub async fn resolve_entries(&self, hierarchy: &MenuHierarchy) -> EntryMap {
        let mut entries = EntryMap::new();
        for id in hierarchy.displayable.values().flatten() {
            let Some(option) = hierarchy.option(*id) else {
                continue;
            };
            let mode = if hierarchy.is_current(*id) {
                LinkMode::NonLink
            } else {
                LinkMode::Link
            };
            let resolved = self.links.entries(option, hierarchy.link_params(), mode).await;
            entries.insert(*id, resolved);
        }
        entries
    }

    /// Renders a group's menu as HTML.
    ///
    /// Unknown groups and storage failures render as an empty string.
    pub async fn render<'a>(&self, group: impl Into<GroupRef<'a>>, request: &MenuRequest, tags: &MenuTags) -> String {
        let group = match self.find_group(group.into()).await {
            Ok(Some(group)) => group,
            Ok(None) => {
                debug!("Menu group not found, rendering nothing");
                return String::new();
            }
            Err(e) => {
                error!("Failed to load menu group: {}", e);
                return String::new();
            }
        };

        let hierarchy = match self.generate_hierarchy(&group, request).await {
            Ok(hierarchy) => hierarchy,
            Err(e) => {
                error!(group = %group.name, "Failed to load menu options: {}", e);
                return String::new();
            }
        };

        let entries = self.resolve_entries(&hierarchy).await;
        let html = render_menu(&hierarchy, &entries, tags);
        info!(group = %group.name, path = %request.path, current = ?hierarchy.current(), "Rendered menu");
        html
    }
}
