//! Requesting user and permissions

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Permission in `app_label.codename` form, e.g. `blog.change_post`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(pub String);

impl Permission {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Permission {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for Permission {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// The user a menu is being rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestUser {
    Anonymous,
    Authenticated {
        username: String,
        is_staff: bool,
        is_superuser: bool,
        permissions: BTreeSet<Permission>,
    },
}

impl Default for RequestUser {
    fn default() -> Self {
        RequestUser::Anonymous
    }
}

impl RequestUser {
    pub fn authenticated(username: impl Into<String>) -> Self {
        RequestUser::Authenticated {
            username: username.into(),
            is_staff: false,
            is_superuser: false,
            permissions: BTreeSet::new(),
        }
    }

    pub fn staff(username: impl Into<String>) -> Self {
        RequestUser::Authenticated {
            username: username.into(),
            is_staff: true,
            is_superuser: false,
            permissions: BTreeSet::new(),
        }
    }

    /// Adds permissions; no-op for anonymous users.
    pub fn with_permissions<I, P>(mut self, granted: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        if let RequestUser::Authenticated { permissions, .. } = &mut self {
            permissions.extend(granted.into_iter().map(Into::into));
        }
        self
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, RequestUser::Anonymous)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, RequestUser::Authenticated { is_staff: true, .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            RequestUser::Anonymous => None,
            RequestUser::Authenticated { username, .. } => Some(username),
        }
    }

    /// True when every required permission is held. Superusers hold all.
    pub fn has_all<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        match self {
            RequestUser::Anonymous => false,
            RequestUser::Authenticated { is_superuser: true, .. } => true,
            RequestUser::Authenticated { permissions, .. } => {
                required.into_iter().all(|p| permissions.contains(p))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_all() {
        let user = RequestUser::authenticated("ana").with_permissions(["blog.view", "blog.edit"]);
        let view = Permission::from("blog.view");
        let delete = Permission::from("blog.delete");
        assert!(user.has_all([&view]));
        assert!(!user.has_all([&view, &delete]));
        assert!(user.has_all(std::iter::empty::<&Permission>()));
    }

    #[test]
    fn test_superuser_has_everything() {
        let user = RequestUser::Authenticated {
            username: "root".to_string(),
            is_staff: true,
            is_superuser: true,
            permissions: BTreeSet::new(),
        };
        assert!(user.has_all([&Permission::from("anything.at_all")]));
    }

    #[test]
    fn test_anonymous() {
        let user = RequestUser::default();
        assert!(user.is_anonymous());
        assert!(!user.is_staff());
        assert!(user.username().is_none());
    }
}
