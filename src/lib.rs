//! Floorhost — table availability and assignment engine for a restaurant
//! front of house.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, state, errors, HTTP server
//! ├── auth/          # Caller identity resolution
//! ├── db/            # Record store (redb) and record models
//! ├── engine/        # Wait estimation, assignment policy, state machine
//! ├── stats/         # Dashboard aggregation over historical records
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging and time helpers
//! ```
//!
//! The engine itself is transport-agnostic: every operation in
//! [`engine::actions`] is a synchronous read-validate-write transaction
//! against [`db::FloorStorage`], taking the current time as a parameter.
//! The `api` layer is a thin axum front over those operations.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod engine;
pub mod stats;
pub mod utils;

// Re-export public types
pub use crate::auth::CurrentUser;
pub use crate::core::{AppError, AppResult, Config, Server, ServerState};
pub use crate::db::FloorStorage;
pub use crate::utils::logger::init_logger;
