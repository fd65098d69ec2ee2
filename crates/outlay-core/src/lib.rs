//! Outlay core library
//!
//! Models, errors, and the SQLite persistence layer shared by the
//! `outlay` CLI and the web server.

pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
