//! Recommendations Backend Library
//!
//! REST API for submitting music recommendations and voting on them.
//! The binary in `src/main.rs` wires configuration, storage and the router.

pub mod api;
pub mod config;
pub mod error;
/// Recommendation model and storage backends
pub mod recommendations;
pub mod services;
/// Application state shared by handlers
pub mod state;
