//! HTTP API handlers.
//!
//! Each submodule handles one surface: the two AI endpoints, the todo CRUD
//! surface, the board, and health.

// Core modules
pub mod router;
pub mod state;
pub mod types;

// Health
pub mod health;

// AI endpoints
pub mod extract;
pub mod summary;

// Task management
pub mod todos;

// Board CRUD surface
pub mod articles;

// Re-export commonly used items
pub use router::{build_protected_routes, build_public_routes, build_router, AppState};
pub use state::AppStateInner;
pub use types::*;
