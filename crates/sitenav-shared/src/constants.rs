//! Application-wide constants

pub const DEFAULT_MANAGER: &str = "objects";
pub const SESSION_COOKIE: &str = "sitenav_session";
pub const DEFAULT_GROUP_TAG: &str = "ul";
pub const DEFAULT_ITEM_TAG: &str = "li";
pub const DEFAULT_JWT_SECRET: &str = "change-me";
