//! # Sitenav API
//! 
//! HTTP handlers, breadcrumb middleware, request-user extraction and the
//! response types of the menu server.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
