//! URL routing port, current-URL discovery and lazy reversal

pub mod url_resolver;
pub mod discovery;
pub mod lazy_url;

pub use url_resolver::{reverse_required, NoReverseMatch, ResolvedPath, RouteEntry, UrlResolver};
pub use discovery::discover_current_url;
pub use lazy_url::LazyUrl;

#[cfg(test)]
pub use url_resolver::MockUrlResolver;
