//! # pgkit: PostgreSQL connection & session layer
//!
//! Provides a pooled database engine and session lifecycle helpers for a
//! web application's data layer: environment-driven configuration, a
//! connection pool with pre-ping validation, per-request sessions with
//! guaranteed release, and idempotent schema create/drop over registered
//! table definitions.
//!
//! The engine is an explicitly constructed object meant to be dependency-
//! injected into handlers (typically behind an `Arc`), not a module-level
//! singleton.

pub mod config;
pub mod error;
pub mod manager;
pub mod schema;
pub mod session;
pub mod stats;

// Re-export core types
pub use config::*;
pub use error::*;
pub use manager::*;
pub use schema::*;
pub use session::*;
pub use stats::*;
