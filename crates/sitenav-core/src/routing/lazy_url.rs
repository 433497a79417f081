//! Deferred URL reversal

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use super::url_resolver::{NoReverseMatch, UrlResolver};
use crate::domain::UrlKwargs;

/// A route reference resolved on first use.
///
/// Useful where a URL is needed before every route is registered, e.g. in
/// configuration built at startup. A successful reversal is cached; a
/// failed one is retried next time.
#[derive(Clone)]
pub struct LazyUrl {
    name: String,
    kwargs: UrlKwargs,
    resolver: Arc<dyn UrlResolver>,
    cached: Arc<OnceCell<String>>,
}

impl LazyUrl {
    pub fn new(name: impl Into<String>, kwargs: UrlKwargs, resolver: Arc<dyn UrlResolver>) -> Self {
        Self {
            name: name.into(),
            kwargs,
            resolver,
            cached: Arc::new(OnceCell::new()),
        }
    }

    pub fn resolve(&self) -> Result<&str, NoReverseMatch> {
        self.cached
            .get_or_try_init(|| self.resolver.reverse(&self.name, &self.kwargs))
            .map(String::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl fmt::Debug for LazyUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyUrl")
            .field("name", &self.name)
            .field("kwargs", &self.kwargs)
            .field("resolved", &self.cached.get())
            .finish()
    }
}

/// Writes the URL, or nothing (with a warning) if it cannot be reversed.
impl fmt::Display for LazyUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Ok(url) => f.write_str(url),
            Err(e) => {
                warn!("Lazy URL could not be resolved: {}", e);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::MockUrlResolver;

    #[test]
    fn test_resolves_once() {
        let mut resolver = MockUrlResolver::new();
        resolver
            .expect_reverse()
            .times(1)
            .returning(|_, _| Ok("/about/".to_string()));

        let url = LazyUrl::new("about", UrlKwargs::new(), Arc::new(resolver));
        assert!(!url.is_resolved());
        assert_eq!(url.to_string(), "/about/");
        assert_eq!(url.resolve().unwrap(), "/about/");
        assert!(url.is_resolved());
    }

    #[test]
    fn test_failure_is_retried() {
        let mut resolver = MockUrlResolver::new();
        let mut seq = mockall::Sequence::new();
        resolver
            .expect_reverse()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name, _| Err(NoReverseMatch::new(name, "not registered yet")));
        resolver
            .expect_reverse()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("/late/".to_string()));

        let url = LazyUrl::new("late", UrlKwargs::new(), Arc::new(resolver));
        assert_eq!(url.to_string(), "");
        assert_eq!(url.resolve().unwrap(), "/late/");
    }
}
