//! Error responses.
//!
//! Every failure is returned as `{"detail": "..."}` with a status that
//! identifies the failure class.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::directory::{AdmissionError, DirectoryError, ServiceError};

/// Failure returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    Admission(AdmissionError),
    /// The body or query string could not be decoded.
    Malformed(StatusCode, String),
    InvalidEmployee(String),
    Storage,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Admission(AdmissionError::MissingOrganization) => StatusCode::BAD_REQUEST,
            ApiError::Admission(AdmissionError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Admission(AdmissionError::InvalidOrganization) => StatusCode::FORBIDDEN,
            ApiError::Malformed(status, _) => *status,
            ApiError::InvalidEmployee(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Admission(e) => e.to_string(),
            ApiError::Malformed(_, reason) => reason.clone(),
            ApiError::InvalidEmployee(reason) => reason.clone(),
            ApiError::Storage => "Failed to store employee".to_string(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        ApiError::Admission(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::Malformed(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected query string");
        ApiError::Malformed(rejection.status(), rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Admission(e) => ApiError::Admission(e),
            ServiceError::Directory(DirectoryError::InvalidEmployee(reason)) => {
                ApiError::InvalidEmployee(reason)
            }
            ServiceError::Directory(DirectoryError::Storage(_)) => ApiError::Storage,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
