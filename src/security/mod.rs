//! Request admission.
//!
//! # Data Flow
//! ```text
//! Incoming request (org from X-Org-Id):
//!     → rate_limit.rs (per-organization window count)
//!     → tenant.rs (identifier well-formedness)
//!     → Pass to the directory engine
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any admission failure
//! - Rejections never reach storage

pub mod rate_limit;
pub mod tenant;

pub use rate_limit::RateLimiter;
