//! Menu tables held in process memory

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use sitenav_core::domain::{GroupId, MenuGroup, MenuOption, OptionId};
use sitenav_core::error::DomainError;
use sitenav_core::repositories::MenuRepository;

#[derive(Default)]
struct MenuTables {
    groups: BTreeMap<GroupId, MenuGroup>,
    options: BTreeMap<OptionId, MenuOption>,
}

/// Ids below 1 are assigned on insert, the way a serial column would.
#[derive(Default)]
pub struct InMemoryMenuRepository {
    tables: RwLock<MenuTables>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn find_group_by_id(&self, id: GroupId) -> Result<Option<MenuGroup>, DomainError> {
        Ok(self.tables.read().groups.get(&id).cloned())
    }

    async fn find_group_by_name(&self, name: &str) -> Result<Option<MenuGroup>, DomainError> {
        Ok(self.tables.read().groups.values().find(|g| g.name == name).cloned())
    }

    async fn create_group(&self, group: &MenuGroup) -> Result<MenuGroup, DomainError> {
        let mut tables = self.tables.write();
        let mut created = group.clone();
        if created.id < 1 {
            created.id = next_id(&tables.groups);
        }
        if tables.groups.contains_key(&created.id) {
            return Err(DomainError::ValidationError(format!("Menu group {} already exists", created.id)));
        }
        tables.groups.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_option(&self, id: OptionId) -> Result<Option<MenuOption>, DomainError> {
        Ok(self.tables.read().options.get(&id).cloned())
    }

    async fn list_options(&self, group_id: GroupId) -> Result<Vec<MenuOption>, DomainError> {
        let tables = self.tables.read();
        let mut options: Vec<MenuOption> = tables
            .options
            .values()
            .filter(|o| o.menu_group_id == group_id)
            .cloned()
            .collect();
        options.sort_by_key(|o| (o.ordering, o.id));
        Ok(options)
    }

    async fn save_option(&self, option: &MenuOption) -> Result<MenuOption, DomainError> {
        let mut tables = self.tables.write();
        let mut saved = option.clone();
        if saved.id < 1 {
            saved.id = next_id(&tables.options);
        }
        tables.options.insert(saved.id, saved.clone());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sitenav_core::domain::{MenuOptionRecord, OptionType};

    fn option(id: OptionId, ordering: i32) -> MenuOption {
        let record: MenuOptionRecord = serde_json::from_value(serde_json::json!({
            "id": id,
            "menu_group_id": 1,
            "name": format!("Option {}", id),
            "option_type": "absolute",
            "url": "/",
            "ordering": ordering,
        }))
        .unwrap();
        assert_eq!(record.option_type, OptionType::Absolute);
        MenuOption::try_from(record).unwrap()
    }

    #[tokio::test]
    async fn test_options_ordered_by_ordering_then_id() {
        let repo = InMemoryMenuRepository::new();
        for (id, ordering) in [(3, 1), (1, 2), (2, 1)] {
            repo.save_option(&option(id, ordering)).await.unwrap();
        }
        let ids: Vec<_> = repo.list_options(1).await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(repo.list_options(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_assigned_on_insert() {
        let repo = InMemoryMenuRepository::new();
        let group = MenuGroup {
            id: 0,
            name: "main".to_string(),
            notes: String::new(),
            created_at: Utc::now(),
        };
        let first = repo.create_group(&group).await.unwrap();
        let second = repo.create_group(&group).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(repo.find_group_by_name("main").await.unwrap().map(|g| g.id), Some(1));

        let saved = repo.save_option(&option(0, 1)).await.unwrap();
        assert_eq!(saved.id, 1);
    }
}
