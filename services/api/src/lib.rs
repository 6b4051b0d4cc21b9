//! Course Advisor API Library Crate
//!
//! This library contains the web service around `advisor-core`: configuration,
//! the shared application state, the API handlers, and routing. The binaries in
//! `bin/` are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
