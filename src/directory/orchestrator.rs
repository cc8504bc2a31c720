//! Request sequencing: admission, then search or insert.

use std::sync::Arc;

use crate::directory::engine::{SearchEngine, SearchPage};
use crate::directory::error::{AdmissionError, ServiceError};
use crate::directory::model::EmployeePayload;
use crate::directory::request::{PageRequest, SearchRequest};
use crate::observability::metrics;
use crate::security::{tenant, RateLimiter};

/// Front door for directory operations.
///
/// Every call runs the same admission sequence and stops at the first
/// failure: organization present, rate limit, tenant check.
#[derive(Clone)]
pub struct DirectoryService {
    limiter: Arc<RateLimiter>,
    engine: SearchEngine,
    rate_limit_enabled: bool,
}

impl DirectoryService {
    pub fn new(limiter: Arc<RateLimiter>, engine: SearchEngine) -> Self {
        Self {
            limiter,
            engine,
            rate_limit_enabled: true,
        }
    }

    /// Skip the rate limit check entirely.
    pub fn without_rate_limit(mut self) -> Self {
        self.rate_limit_enabled = false;
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run admission for the caller's organization and return it.
    pub fn admit<'a>(&self, org_id: Option<&'a str>) -> Result<&'a str, AdmissionError> {
        let result = self.check_admission(org_id);
        if let Err(e) = &result {
            metrics::record_admission_failure(e.reason());
        }
        result
    }

    fn check_admission<'a>(&self, org_id: Option<&'a str>) -> Result<&'a str, AdmissionError> {
        let org_id = match org_id {
            Some(org) if !org.trim().is_empty() => org,
            _ => {
                tracing::error!("Missing organization identifier");
                return Err(AdmissionError::MissingOrganization);
            }
        };

        if self.rate_limit_enabled && !self.limiter.admit(org_id) {
            return Err(AdmissionError::RateLimited);
        }

        if !tenant::validate(org_id) {
            tracing::error!(org_id = %org_id, "Invalid organization");
            return Err(AdmissionError::InvalidOrganization);
        }

        Ok(org_id)
    }

    /// Admit the caller, then search its employees.
    pub fn search(
        &self,
        org_id: Option<&str>,
        request: &SearchRequest,
        page: &PageRequest,
    ) -> Result<SearchPage, AdmissionError> {
        let org_id = self.admit(org_id)?;

        let result = self
            .engine
            .search(org_id, &request.filters, request.columns.as_deref(), page);

        tracing::info!(
            org_id = %org_id,
            page = page.page,
            results = result.results.len(),
            total = result.total,
            "Search returned {} results",
            result.results.len()
        );
        Ok(result)
    }

    /// Admit the caller, then store a new employee owned by it.
    pub fn add_employee(
        &self,
        org_id: Option<&str>,
        payload: EmployeePayload,
    ) -> Result<i64, ServiceError> {
        let org_id = self.admit(org_id)?;
        let employee = payload.into_employee(org_id);
        Ok(self.engine.add(&employee)?)
    }
}
