//! Employee directory subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator.rs (admission: org present → rate limit → tenant check)
//!     → request.rs (fixed filter set, page/sort normalization)
//!     → query.rs (org-scoped, parameterized SELECT and COUNT)
//!     → engine.rs (execute on a pooled connection, shape rows)
//!     → model.rs (flat rows, projection, status mapping)
//! ```
//!
//! # Design Decisions
//! - The org predicate is always the first clause and cannot be replaced by a filter
//! - Reads fail empty; writes fail loud

pub mod engine;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod query;
pub mod request;

pub use engine::{SearchEngine, SearchPage};
pub use error::{AdmissionError, DirectoryError, ServiceError};
pub use model::{Employee, EmployeePayload, EmployeeStatus, NewEmployee, Row};
pub use orchestrator::DirectoryService;
pub use request::{PageRequest, SearchFilters, SearchRequest};
