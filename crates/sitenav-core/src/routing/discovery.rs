//! Current URL discovery
//!
//! The router resolves a path to a view, but several route names may point
//! at the same view. The name is recovered by reversing every candidate
//! with the captured arguments; the first one that rebuilds the exact path
//! wins, in route table order.

use tracing::debug;

use super::url_resolver::UrlResolver;
use crate::domain::{CurrentUrl, MenuRequest, UrlKwargs};

pub fn discover_current_url(resolver: &dyn UrlResolver, request: &MenuRequest) -> CurrentUrl {
    let absolute = request.absolute_url();
    let path = request.path.clone();

    let resolved = match resolver.resolve(&path) {
        Some(resolved) => resolved,
        None => {
            debug!("Path {} does not resolve to any view", path);
            return CurrentUrl {
                absolute,
                path,
                name: None,
                kwargs: UrlKwargs::new(),
            };
        }
    };

    let name = resolver
        .route_table()
        .into_iter()
        .filter(|entry| entry.view == resolved.view)
        .find(|entry| {
            resolver
                .reverse(&entry.name, &resolved.kwargs)
                .map(|reversed| reversed == path)
                .unwrap_or(false)
        })
        .map(|entry| entry.name);

    debug!("Resolved {} to view {} as {:?}", path, resolved.view, name);

    CurrentUrl {
        absolute,
        path,
        name,
        kwargs: resolved.kwargs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestUser;
    use crate::test_support::FakeResolver;

    fn request(path: &str) -> MenuRequest {
        MenuRequest::new(RequestUser::Anonymous, "http", "testserver", path)
    }

    #[test]
    fn test_first_reversing_name_wins() {
        let resolver = FakeResolver::new()
            .route("archive-all", "archive", "/archive/")
            .route("archive-year", "archive", "/archive/<year>/")
            .route("archive-year-alias", "archive", "/archive/<year>/");

        let current = discover_current_url(&resolver, &request("/archive/2024/"));
        assert_eq!(current.name.as_deref(), Some("archive-year"));
        assert_eq!(current.kwargs.get("year").map(String::as_str), Some("2024"));
        assert_eq!(current.absolute, "http://testserver/archive/2024/");
    }

    #[test]
    fn test_unresolvable_path() {
        let resolver = FakeResolver::new().route("home", "home", "/");
        let current = discover_current_url(&resolver, &request("/nowhere/"));
        assert!(current.name.is_none());
        assert!(current.kwargs.is_empty());
    }
}
