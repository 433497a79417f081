//! Request-derived inputs of the menu engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::user::RequestUser;

/// Keyword arguments extracted from, or used to build, a URL.
pub type UrlKwargs = BTreeMap<String, String>;

/// The parts of an incoming request the menu engine looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRequest {
    pub user: RequestUser,
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl MenuRequest {
    pub fn new(user: RequestUser, scheme: &str, host: &str, path: &str) -> Self {
        Self {
            user,
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    pub fn absolute_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// The current request's URL as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentUrl {
    pub absolute: String,
    pub path: String,
    /// Route name that reverses to exactly `path`, if any.
    pub name: Option<String>,
    pub kwargs: UrlKwargs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let request = MenuRequest::new(RequestUser::Anonymous, "https", "example.com", "/contact/");
        assert_eq!(request.absolute_url(), "https://example.com/contact/");
    }
}
