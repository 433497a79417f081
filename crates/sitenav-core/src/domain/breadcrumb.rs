// ============================================================================
// Sitenav Core - Breadcrumb Trail
// File: crates/sitenav-core/src/domain/breadcrumb.rs
// Description: Per-session trail of visited pages and per-view policies
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::request::UrlKwargs;
use super::user::RequestUser;

/// One displayed crumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub url: String,
    pub title: String,
}

/// Ordered visited paths plus a path to title map, kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BreadcrumbTrail {
    pub urls: Vec<String>,
    pub titles: HashMap<String, String>,
}

impl BreadcrumbTrail {
    /// A trail holding only the root crumb.
    pub fn rooted(root_url: &str, root_title: &str) -> Self {
        Self {
            urls: vec![root_url.to_string()],
            titles: HashMap::from([(root_url.to_string(), root_title.to_string())]),
        }
    }

    /// Appends `path`. When the path is already on the trail, everything
    /// from its earlier occurrence on is dropped first.
    pub fn include(&mut self, path: &str, title: String) {
        if let Some(index) = self.urls.iter().position(|url| url == path) {
            for url in self.urls.drain(index..) {
                self.titles.remove(&url);
            }
        }
        self.urls.push(path.to_string());
        self.titles.insert(path.to_string(), title);
    }

    pub fn crumbs(&self) -> Vec<Crumb> {
        self.urls
            .iter()
            .map(|url| Crumb {
                url: url.clone(),
                title: self.titles.get(url).cloned().unwrap_or_else(|| url.clone()),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// What a policy closure sees: the same inputs the endpoint receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrumbContext {
    pub path: String,
    pub view: Option<String>,
    pub kwargs: UrlKwargs,
    pub user: RequestUser,
}

/// A fixed value or one computed per request.
#[derive(Clone)]
pub enum Setting<T> {
    Fixed(T),
    Computed(Arc<dyn Fn(&CrumbContext) -> T + Send + Sync>),
}

impl<T: Clone> Setting<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&CrumbContext) -> T + Send + Sync + 'static,
    {
        Setting::Computed(Arc::new(f))
    }

    pub fn value(&self, ctx: &CrumbContext) -> T {
        match self {
            Setting::Fixed(value) => value.clone(),
            Setting::Computed(f) => f(ctx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Setting::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// How visiting a view changes the trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbPolicy {
    pub title: Setting<String>,
    pub reset: Setting<bool>,
    pub include: Setting<bool>,
}

impl BreadcrumbPolicy {
    pub fn new(title: Setting<String>, reset: Setting<bool>, include: Setting<bool>) -> Self {
        Self { title, reset, include }
    }

    /// Collapse the trail to the root crumb, then add this page.
    pub fn reset(title: impl Into<String>) -> Self {
        Self::new(Setting::Fixed(title.into()), Setting::Fixed(true), Setting::Fixed(true))
    }

    /// Add this page to the end of the trail.
    pub fn include(title: impl Into<String>) -> Self {
        Self::new(Setting::Fixed(title.into()), Setting::Fixed(false), Setting::Fixed(true))
    }

    /// Leave the trail alone.
    pub fn ignore() -> Self {
        Self::new(Setting::Fixed(String::new()), Setting::Fixed(false), Setting::Fixed(false))
    }
}

impl Default for BreadcrumbPolicy {
    fn default() -> Self {
        Self::ignore()
    }
}

/// Policies keyed by view name.
#[derive(Debug, Clone, Default)]
pub struct BreadcrumbRegistry {
    policies: HashMap<String, BreadcrumbPolicy>,
}

impl BreadcrumbRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, view: impl Into<String>, policy: BreadcrumbPolicy) -> &mut Self {
        self.policies.insert(view.into(), policy);
        self
    }

    /// Unregistered views are ignored.
    pub fn policy_for(&self, view: Option<&str>) -> BreadcrumbPolicy {
        view.and_then(|v| self.policies.get(v)).cloned().unwrap_or_default()
    }
}
