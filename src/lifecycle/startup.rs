//! Startup assembly.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::directory::{DirectoryService, SearchEngine};
use crate::security::RateLimiter;
use crate::storage::{Database, StorageResult};

/// Open the store, create the schema, and assemble the directory service.
pub fn build_service(config: &ServiceConfig) -> StorageResult<DirectoryService> {
    let db = Database::open(&config.database)?;
    db.init_schema()?;

    let limiter = Arc::new(RateLimiter::new(config.rate_limit.requests_per_window));
    let service = DirectoryService::new(limiter, SearchEngine::new(db));

    if config.rate_limit.enabled {
        Ok(service)
    } else {
        tracing::warn!("Rate limiting disabled");
        Ok(service.without_rate_limit())
    }
}
