//! Routing service trait (port)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UrlKwargs;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No reverse match for '{name}': {reason}")]
pub struct NoReverseMatch {
    pub name: String,
    pub reason: String,
}

impl NoReverseMatch {
    pub fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// A path resolved to its view plus the arguments captured from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub view: String,
    pub kwargs: UrlKwargs,
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    pub view: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Option<ResolvedPath>;

    /// Named routes in registration order.
    fn route_table(&self) -> Vec<RouteEntry>;

    /// Argument names the first route registered under `name` needs.
    fn route_arguments(&self, name: &str) -> Option<Vec<String>>;

    /// Fails on missing or extra arguments and on values a converter rejects.
    fn reverse(&self, name: &str, kwargs: &UrlKwargs) -> Result<String, NoReverseMatch>;
}

/// Reverses `name` passing only the arguments the route needs.
///
/// `override_arg` replaces one argument regardless of `available`. Returns
/// `None` when a needed argument is missing or reversal fails.
pub fn reverse_required(
    resolver: &dyn UrlResolver,
    name: &str,
    available: &UrlKwargs,
    override_arg: Option<(&str, &str)>,
) -> Option<String> {
    let arguments = resolver.route_arguments(name)?;

    let mut kwargs = UrlKwargs::new();
    for argument in arguments {
        let value = match override_arg {
            Some((key, value)) if key == argument => value.to_string(),
            _ => available.get(&argument)?.clone(),
        };
        kwargs.insert(argument, value);
    }

    resolver.reverse(name, &kwargs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_reverse_required_drops_extra_arguments() {
        let mut resolver = MockUrlResolver::new();
        resolver
            .expect_route_arguments()
            .with(eq("blog-detail"))
            .returning(|_| Some(vec!["slug".to_string()]));
        resolver
            .expect_reverse()
            .withf(|name, kwargs| name == "blog-detail" && kwargs.len() == 1 && kwargs["slug"] == "x")
            .returning(|_, _| Ok("/blog/x/".to_string()));

        let available = UrlKwargs::from([
            ("slug".to_string(), "x".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);
        assert_eq!(
            reverse_required(&resolver, "blog-detail", &available, None).as_deref(),
            Some("/blog/x/")
        );
    }

    #[test]
    fn test_reverse_required_missing_argument() {
        let mut resolver = MockUrlResolver::new();
        resolver
            .expect_route_arguments()
            .returning(|_| Some(vec!["slug".to_string()]));
        resolver.expect_reverse().never();

        assert!(reverse_required(&resolver, "blog-detail", &UrlKwargs::new(), None).is_none());
    }

    #[test]
    fn test_reverse_required_override() {
        let mut resolver = MockUrlResolver::new();
        resolver
            .expect_route_arguments()
            .returning(|_| Some(vec!["pk".to_string()]));
        resolver
            .expect_reverse()
            .withf(|_, kwargs| kwargs["pk"] == "3")
            .returning(|_, _| Ok("/articles/3/".to_string()));

        let available = UrlKwargs::from([("pk".to_string(), "1".to_string())]);
        assert_eq!(
            reverse_required(&resolver, "article-detail", &available, Some(("pk", "3"))).as_deref(),
            Some("/articles/3/")
        );
    }
}
