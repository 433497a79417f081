//! Menu repository trait (port)

use async_trait::async_trait;

use crate::domain::{GroupId, MenuGroup, MenuOption, OptionId};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_group_by_id(&self, id: GroupId) -> Result<Option<MenuGroup>, DomainError>;
    /// Lowest id wins when several groups share a name.
    async fn find_group_by_name(&self, name: &str) -> Result<Option<MenuGroup>, DomainError>;
    async fn create_group(&self, group: &MenuGroup) -> Result<MenuGroup, DomainError>;
    async fn find_option(&self, id: OptionId) -> Result<Option<MenuOption>, DomainError>;
    /// Options of a group ordered by `(ordering, id)`.
    async fn list_options(&self, group_id: GroupId) -> Result<Vec<MenuOption>, DomainError>;
    /// Inserts or replaces an option.
    async fn save_option(&self, option: &MenuOption) -> Result<MenuOption, DomainError>;
}
