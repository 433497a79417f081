//! URL routing adapter

pub mod pattern_router;

pub use pattern_router::{Converter, PatternRouter, RouteError};
