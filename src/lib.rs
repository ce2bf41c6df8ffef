//! AI-assisted todo service with a companion article board.
//!
//! The server exposes two model-backed endpoints (free-text extraction and
//! periodic summaries), a user-scoped todo CRUD surface, and a small
//! form-backed board. The `client` module is the state layer a frontend
//! embeds: optimistic mutations with snapshot rollback, filtering and
//! sorting.

pub mod auth;
pub mod client;
pub mod config;
pub mod dates;
pub mod errors;
pub mod extraction;
pub mod handlers;
pub mod inference;
pub mod model;
pub mod prompts;
pub mod stats;
pub mod store;
pub mod validation;
