// ============================================================================
// Sitenav Core - Breadcrumb Service
// File: crates/sitenav-core/src/services/breadcrumb_service.rs
// Description: Updates and reads per-session breadcrumb trails
// ============================================================================

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::{BreadcrumbRegistry, BreadcrumbTrail, Crumb, CrumbContext};
use crate::repositories::BreadcrumbStore;
use crate::routing::LazyUrl;

/// URL of the first crumb.
#[derive(Debug, Clone)]
pub enum RootUrl {
    Literal(String),
    /// Reversed on first use.
    Route(LazyUrl),
}

impl RootUrl {
    fn url(&self) -> String {
        match self {
            RootUrl::Literal(url) => url.clone(),
            RootUrl::Route(lazy) => match lazy.resolve() {
                Ok(url) => url.to_string(),
                Err(e) => {
                    warn!("Breadcrumb root falls back to '/': {}", e);
                    "/".to_string()
                }
            },
        }
    }
}

pub struct BreadcrumbService<B: BreadcrumbStore + ?Sized> {
    store: Arc<B>,
    registry: BreadcrumbRegistry,
    root_url: RootUrl,
    root_title: String,
}

impl<B: BreadcrumbStore + ?Sized> BreadcrumbService<B> {
    pub fn new(store: Arc<B>, registry: BreadcrumbRegistry, root_url: RootUrl, root_title: impl Into<String>) -> Self {
        Self {
            store,
            registry,
            root_url,
            root_title: root_title.into(),
        }
    }

    fn rooted(&self) -> BreadcrumbTrail {
        BreadcrumbTrail::rooted(&self.root_url.url(), &self.root_title)
    }

    async fn load(&self, session_id: &str) -> Option<BreadcrumbTrail> {
        match self.store.load(session_id).await {
            Ok(trail) => trail,
            Err(e) => {
                error!("Failed to load breadcrumb trail: {}", e);
                None
            }
        }
    }

    /// Applies the policy registered for the visited view to the session's
    /// trail and returns the result.
    ///
    /// A session without a trail starts from the root crumb. Storage
    /// failures are logged and never fail the request.
    pub async fn track(&self, session_id: &str, ctx: &CrumbContext) -> BreadcrumbTrail {
        let policy = self.registry.policy_for(ctx.view.as_deref());
        let existing = self.load(session_id).await;

        let mut changed = false;
        let mut trail = match existing {
            Some(trail) if !policy.reset.value(ctx) => trail,
            _ => {
                changed = true;
                self.rooted()
            }
        };

        if policy.include.value(ctx) {
            trail.include(&ctx.path, policy.title.value(ctx));
            changed = true;
        }

        if changed {
            debug!(path = %ctx.path, crumbs = trail.urls.len(), "Breadcrumb trail updated");
            if let Err(e) = self.store.store(session_id, &trail).await {
                error!("Failed to store breadcrumb trail: {}", e);
            }
        }

        trail
    }

    /// Crumbs to display; just the root crumb when the session has none.
    pub async fn crumbs(&self, session_id: &str) -> Vec<Crumb> {
        match self.load(session_id).await {
            Some(trail) if !trail.is_empty() => trail.crumbs(),
            _ => self.root_crumbs(),
        }
    }

    /// The trail a new session starts with.
    pub fn root_crumbs(&self) -> Vec<Crumb> {
        self.rooted().crumbs()
    }
}
