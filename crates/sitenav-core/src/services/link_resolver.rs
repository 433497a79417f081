//! Turns menu options into renderable link entries

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{MenuOption, MenuTarget, ModelTarget, UrlKwargs};
use crate::repositories::RecordStore;
use crate::routing::{reverse_required, UrlResolver};
use crate::services::query_service::RecordQueryService;

/// One rendered entry. Model options produce one per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub text: String,
    pub title: String,
    /// `None` renders as a non-link.
    pub href: Option<String>,
    /// Set on the model row matching the current URL.
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Link,
    /// Used for the option matching the current page.
    NonLink,
}

pub struct LinkResolver<S: RecordStore + ?Sized> {
    queries: RecordQueryService<S>,
    urls: Arc<dyn UrlResolver>,
}

impl<S: RecordStore + ?Sized> LinkResolver<S> {
    pub fn new(queries: RecordQueryService<S>, urls: Arc<dyn UrlResolver>) -> Self {
        Self { queries, urls }
    }

    /// Whether the option can produce a URL for the current request.
    pub async fn can_generate(&self, option: &MenuOption, kwargs: &UrlKwargs) -> bool {
        match &option.target {
            MenuTarget::Absolute { .. } => true,
            MenuTarget::Named { url_name } => reverse_required(self.urls.as_ref(), url_name, kwargs, None).is_some(),
            MenuTarget::Model(_) => !self.queries.fetch(option, kwargs, &[]).await.is_empty(),
        }
    }

    /// Entries for `option`, built with `kwargs` as URL arguments.
    ///
    /// A named option whose route cannot be reversed yields nothing.
    pub async fn entries(&self, option: &MenuOption, kwargs: &UrlKwargs, mode: LinkMode) -> Vec<LinkEntry> {
        let plain = |href: Option<String>| LinkEntry {
            text: option.name.clone(),
            title: option.alt_text.clone(),
            href,
            selected: false,
        };

        match (&option.target, mode) {
            (MenuTarget::Model(model), _) => self.model_entries(option, model, kwargs, mode).await,
            (_, LinkMode::NonLink) => vec![plain(None)],
            (MenuTarget::Absolute { url }, LinkMode::Link) => vec![plain(Some(url.clone()))],
            (MenuTarget::Named { url_name }, LinkMode::Link) => {
                match reverse_required(self.urls.as_ref(), url_name, kwargs, None) {
                    Some(href) => vec![plain(Some(href))],
                    None => {
                        debug!(option_id = option.id, url_name = %url_name, "Cannot reverse menu link");
                        Vec::new()
                    }
                }
            }
        }
    }

    async fn model_entries(
        &self,
        option: &MenuOption,
        model: &ModelTarget,
        kwargs: &UrlKwargs,
        mode: LinkMode,
    ) -> Vec<LinkEntry> {
        let current = kwargs.get(&model.url_id);

        self.queries
            .fetch(option, kwargs, &[])
            .await
            .into_iter()
            .map(|row| {
                let value = row.field_text(&model.model_id);
                let selected = value.is_some() && value.as_ref() == current;

                // Only the selected row loses its link, and only in non-link mode
                let href = if mode == LinkMode::NonLink && selected {
                    None
                } else {
                    value.as_deref().and_then(|v| {
                        reverse_required(self.urls.as_ref(), &model.url_name, kwargs, Some((&model.url_id, v)))
                    })
                };

                LinkEntry {
                    text: row.label,
                    title: option.alt_text.clone(),
                    href,
                    selected,
                }
            })
            .collect()
    }
}
