//! Router-level tests over in-memory adapters
