//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → request.rs (request ID span, X-Org-Id extraction)
//!     → handlers.rs (decode body and query, hand off to the directory service)
//!     → response.rs (map failures to status codes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{X_ORG_ID, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
