//! Fakes shared by the unit tests of this crate

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::domain::{
    ContentTypeSchema, MenuOption, MenuTarget, ModelTarget, OptionId, Record, RecordQuery, UrlKwargs,
};
use crate::error::QueryError;
use crate::repositories::RecordStore;
use crate::routing::{NoReverseMatch, ResolvedPath, RouteEntry, UrlResolver};

/// Router over `/segment/<arg>/` patterns, one argument per segment.
#[derive(Default)]
pub struct FakeResolver {
    routes: Vec<(String, String, String)>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, name: &str, view: &str, pattern: &str) -> Self {
        self.routes.push((name.to_string(), view.to_string(), pattern.to_string()));
        self
    }

    fn arguments(pattern: &str) -> Vec<String> {
        pattern
            .split('/')
            .filter_map(|s| s.strip_prefix('<').and_then(|s| s.strip_suffix('>')))
            .map(str::to_string)
            .collect()
    }

    fn capture(pattern: &str, path: &str) -> Option<UrlKwargs> {
        let expected: Vec<&str> = pattern.split('/').collect();
        let actual: Vec<&str> = path.split('/').collect();
        if expected.len() != actual.len() {
            return None;
        }
        let mut kwargs = UrlKwargs::new();
        for (e, a) in expected.iter().zip(actual.iter()) {
            match e.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                Some(name) if !a.is_empty() => {
                    kwargs.insert(name.to_string(), a.to_string());
                }
                Some(_) => return None,
                None if e == a => {}
                None => return None,
            }
        }
        Some(kwargs)
    }
}

impl UrlResolver for FakeResolver {
    fn resolve(&self, path: &str) -> Option<ResolvedPath> {
        self.routes.iter().find_map(|(_, view, pattern)| {
            Self::capture(pattern, path).map(|kwargs| ResolvedPath {
                view: view.clone(),
                kwargs,
            })
        })
    }

    fn route_table(&self) -> Vec<RouteEntry> {
        self.routes
            .iter()
            .map(|(name, view, _)| RouteEntry {
                name: name.clone(),
                view: view.clone(),
            })
            .collect()
    }

    fn route_arguments(&self, name: &str) -> Option<Vec<String>> {
        self.routes
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, pattern)| Self::arguments(pattern))
    }

    fn reverse(&self, name: &str, kwargs: &UrlKwargs) -> Result<String, NoReverseMatch> {
        for (_, _, pattern) in self.routes.iter().filter(|(n, _, _)| n == name) {
            let arguments: BTreeSet<String> = Self::arguments(pattern).into_iter().collect();
            let given: BTreeSet<String> = kwargs.keys().cloned().collect();
            if arguments != given || kwargs.values().any(|v| v.is_empty() || v.contains('/')) {
                continue;
            }
            let path = pattern
                .split('/')
                .map(|segment| match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                    Some(arg) => kwargs[arg].clone(),
                    None => segment.to_string(),
                })
                .collect::<Vec<_>>()
                .join("/");
            return Ok(path);
        }
        Err(NoReverseMatch::new(name, "no pattern accepts these arguments"))
    }
}

/// In-memory store keyed by content type name.
#[derive(Default)]
pub struct FakeRecordStore {
    types: HashMap<String, (ContentTypeSchema, Vec<Record>)>,
}

impl FakeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, schema: ContentTypeSchema, rows: Vec<Value>) -> Self {
        let records = rows.into_iter().map(|row| schema.record_from(row)).collect();
        self.types.insert(schema.name.clone(), (schema, records));
        self
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>, QueryError> {
        let (schema, records) = self
            .types
            .get(&query.content_type)
            .ok_or_else(|| QueryError::UnknownContentType(query.content_type.clone()))?;
        query.apply(schema, records)
    }

    async fn schema(&self, content_type: &str) -> Option<ContentTypeSchema> {
        self.types.get(content_type).map(|(schema, _)| schema.clone())
    }
}

pub fn article_schema() -> ContentTypeSchema {
    ContentTypeSchema {
        name: "article".to_string(),
        label_field: "title".to_string(),
        fields: vec!["id".to_string(), "title".to_string(), "category".to_string()],
        managers: Default::default(),
    }
}

pub fn option(id: OptionId, parent_id: Option<OptionId>, target: MenuTarget) -> MenuOption {
    MenuOption {
        id,
        menu_group_id: 1,
        parent_id,
        name: format!("Option {}", id),
        alt_text: format!("Alt {}", id),
        notes: String::new(),
        ordering: id as i32,
        show_to_anonymous: true,
        show_to_authenticated: true,
        show_to_staff: true,
        permissions: BTreeSet::new(),
        sites: BTreeSet::new(),
        target,
        created_at: Utc::now(),
        modified_at: None,
    }
}

pub fn absolute(url: &str) -> MenuTarget {
    MenuTarget::Absolute { url: url.to_string() }
}

pub fn named(url_name: &str) -> MenuTarget {
    MenuTarget::Named {
        url_name: url_name.to_string(),
    }
}

pub fn article_model(query: &str) -> MenuTarget {
    MenuTarget::Model(ModelTarget {
        url_name: "article-detail".to_string(),
        content_type: "article".to_string(),
        manager: "objects".to_string(),
        query: query.to_string(),
        url_id: "pk".to_string(),
        model_id: "id".to_string(),
        order_by: "id".to_string(),
        result_limit: None,
    })
}

pub fn kwargs(pairs: &[(&str, &str)]) -> UrlKwargs {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
