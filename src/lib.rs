//! Book review service: a small REST API over SQLite plus the client
//! pieces (API client, form, list and detail views) that talk to it.

pub mod app;
pub mod client;
// Careful, there's also the "config" crate we use as a dependency.
pub mod config;
pub mod db;
pub mod utils;
pub mod validation;
