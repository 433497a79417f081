//! End-to-end tests over the pattern router and in-memory adapters

mod scenarios;
