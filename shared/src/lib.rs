//! Shared types for the restaurant POS
//!
//! Domain models, unified error codes and small utilities used by the
//! edge server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
