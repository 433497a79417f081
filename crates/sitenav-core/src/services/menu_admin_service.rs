// ============================================================================
// Sitenav Core - Menu Admin Service
// File: crates/sitenav-core/src/services/menu_admin_service.rs
// Description: Validated writes of menu groups and options
// ============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{MenuGroup, MenuOption, MenuOptionRecord, OptionId};
use crate::error::DomainError;
use crate::repositories::MenuRepository;

/// Write side of the menu tables.
pub struct MenuAdminService<M: MenuRepository + ?Sized> {
    menu_repo: Arc<M>,
}

impl<M: MenuRepository + ?Sized> MenuAdminService<M> {
    pub fn new(menu_repo: Arc<M>) -> Self {
        Self { menu_repo }
    }

    pub async fn create_group(&self, group: MenuGroup) -> Result<MenuGroup, DomainError> {
        group.validate()?;
        let created = self.menu_repo.create_group(&group).await?;
        info!("Menu group created: {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Normalizes, validates and persists an option.
    ///
    /// Fields not belonging to the option's type are cleared first. The
    /// parent must exist in the same group and must not lead back to the
    /// option itself.
    pub async fn save_option(&self, mut record: MenuOptionRecord) -> Result<MenuOption, DomainError> {
        // 1. Drop fields of other option types
        record.normalize();

        // 2. Field constraints, then variant completeness
        record.validate()?;
        let mut option = MenuOption::try_from(record)?;
        option.modified_at = Some(Utc::now());

        // 3. Group and parent checks
        self.menu_repo
            .find_group_by_id(option.menu_group_id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(option.menu_group_id.to_string()))?;

        if let Some(parent) = option.parent_id {
            self.check_parent(&option, parent).await?;
        }

        // 4. Persist
        let saved = self.menu_repo.save_option(&option).await?;
        info!(option_id = saved.id, group_id = saved.menu_group_id, kind = saved.option_type().as_str(), "Menu option saved");
        Ok(saved)
    }

    async fn check_parent(&self, option: &MenuOption, parent_id: OptionId) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let mut cursor = Some(parent_id);

        while let Some(id) = cursor {
            if id == option.id || !seen.insert(id) {
                warn!(option_id = option.id, parent = parent_id, "Rejected parent cycle");
                return Err(DomainError::ParentCycle {
                    option: option.id,
                    parent: parent_id,
                });
            }

            let ancestor = self
                .menu_repo
                .find_option(id)
                .await?
                .ok_or(DomainError::OptionNotFound(id))?;

            if id == parent_id && ancestor.menu_group_id != option.menu_group_id {
                return Err(DomainError::ParentInOtherGroup {
                    parent: parent_id,
                    parent_group: ancestor.menu_group_id,
                    group: option.menu_group_id,
                });
            }
            cursor = ancestor.parent_id;
        }

        Ok(())
    }
}
