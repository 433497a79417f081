//! HTTP handlers

pub mod breadcrumbs;
pub mod health;
pub mod menu;
pub mod page;
