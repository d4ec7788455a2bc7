//! Ad Report Proxy Backend Library
//!
//! Exposes core modules for use by the server binary and tests.

pub mod api;
pub mod config;
pub mod report;
pub mod upstream;
