//! Decides whether an option corresponds to the current URL

use tracing::debug;

use crate::domain::{CurrentUrl, FilterClause, MenuOption, MenuTarget};
use crate::repositories::RecordStore;
use crate::services::query_service::RecordQueryService;

pub struct UrlMatcher<S: RecordStore + ?Sized> {
    queries: RecordQueryService<S>,
}

impl<S: RecordStore + ?Sized> UrlMatcher<S> {
    pub fn new(queries: RecordQueryService<S>) -> Self {
        Self { queries }
    }

    /// Absolute URLs starting with `/` compare with the request path, other
    /// absolute URLs with the full URL. Named options compare route names.
    /// Model options also need a row whose `model_id` equals the URL's
    /// `url_id` argument.
    pub async fn url_matches(&self, option: &MenuOption, current: &CurrentUrl) -> bool {
        match &option.target {
            MenuTarget::Absolute { url } if url.starts_with('/') => *url == current.path,
            MenuTarget::Absolute { url } => *url == current.absolute,
            MenuTarget::Named { url_name } => current.name.as_deref() == Some(url_name.as_str()),
            MenuTarget::Model(model) => {
                if current.name.as_deref() != Some(model.url_name.as_str()) {
                    return false;
                }
                let value = match current.kwargs.get(&model.url_id) {
                    Some(value) => value,
                    None => {
                        debug!(option_id = option.id, url_id = %model.url_id, "Current URL lacks model argument");
                        return false;
                    }
                };

                let join = FilterClause::equals(&model.model_id, value);
                !self.queries.fetch(option, &current.kwargs, &[join]).await.is_empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UrlKwargs;
    use crate::test_support::{absolute, article_model, article_schema, kwargs, named, option, FakeRecordStore};
    use serde_json::json;
    use std::sync::Arc;

    fn matcher() -> UrlMatcher<FakeRecordStore> {
        let store = FakeRecordStore::new().content_type(
            article_schema(),
            vec![
                json!({"id": 1, "title": "Alpha", "category": "news"}),
                json!({"id": 2, "title": "Beta", "category": "sport"}),
            ],
        );
        UrlMatcher::new(RecordQueryService::new(Arc::new(store)))
    }

    fn current(path: &str, name: Option<&str>, args: UrlKwargs) -> CurrentUrl {
        CurrentUrl {
            absolute: format!("http://testserver{}", path),
            path: path.to_string(),
            name: name.map(str::to_string),
            kwargs: args,
        }
    }

    #[tokio::test]
    async fn test_absolute_matches_path_or_full_url() {
        let m = matcher();
        let here = current("/contact/", None, UrlKwargs::new());
        assert!(m.url_matches(&option(1, None, absolute("/contact/")), &here).await);
        assert!(m.url_matches(&option(2, None, absolute("http://testserver/contact/")), &here).await);
        assert!(!m.url_matches(&option(3, None, absolute("/contact")), &here).await);
        assert!(!m.url_matches(&option(4, None, absolute("https://elsewhere.org/contact/")), &here).await);
    }

    #[tokio::test]
    async fn test_named_matches_route_name() {
        let m = matcher();
        let here = current("/blog/", Some("blog-index"), UrlKwargs::new());
        assert!(m.url_matches(&option(1, None, named("blog-index")), &here).await);
        assert!(!m.url_matches(&option(2, None, named("home")), &here).await);
        assert!(!m.url_matches(&option(3, None, named("home")), &current("/nowhere/", None, UrlKwargs::new())).await);
    }

    #[tokio::test]
    async fn test_model_needs_matching_row() {
        let m = matcher();
        let opt = option(1, None, article_model("category=news"));

        let on_alpha = current("/articles/1/", Some("article-detail"), kwargs(&[("pk", "1")]));
        let on_beta = current("/articles/2/", Some("article-detail"), kwargs(&[("pk", "2")]));
        let other_route = current("/blog/1/", Some("blog-detail"), kwargs(&[("pk", "1")]));
        let no_arg = current("/articles/", Some("article-detail"), UrlKwargs::new());

        assert!(m.url_matches(&opt, &on_alpha).await);
        assert!(!m.url_matches(&opt, &on_beta).await);
        assert!(!m.url_matches(&opt, &other_route).await);
        assert!(!m.url_matches(&opt, &no_arg).await);
    }
}
