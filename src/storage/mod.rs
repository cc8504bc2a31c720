//! Storage subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → Database::connection() (checkout from the r2d2 pool)
//!     → directory engine runs parameterized SQL on the handle
//!     → handle returned to the pool when dropped
//! ```
//!
//! # Design Decisions
//! - One pooled connection per request, never shared across requests
//! - Timeouts belong to the pool (checkout) and SQLite (busy timeout)
//! - ":memory:" runs on a single long-lived connection

pub mod database;
pub mod error;
pub mod schema;

pub use database::{Connection, Database};
pub use error::{StorageError, StorageResult};
