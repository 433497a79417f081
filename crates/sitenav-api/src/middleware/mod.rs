//! Request middleware

pub mod breadcrumb;

pub use breadcrumb::{session_from_headers, track_breadcrumbs, SessionId};
