//! # Sitenav Shared
//! 
//! Configuration, telemetry, constants and small helpers shared by every
//! sitenav crate.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use error::AppError;
