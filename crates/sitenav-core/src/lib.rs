//! # Sitenav Core
//! 
//! Menu entities, the ports the engine needs from storage and routing, and
//! the services that decide which menu options are shown, which one is
//! selected and how the result is rendered. Breadcrumb trails and lazily
//! reversed URLs live here too.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod routing;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, QueryError};
