//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod admin;
pub mod expenses;

// Re-export all handlers for use in router
pub use admin::*;
pub use expenses::*;
