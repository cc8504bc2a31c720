//! Multi-tenant employee directory search service.

pub mod config;
pub mod directory;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod storage;

pub use config::ServiceConfig;
pub use directory::DirectoryService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
