use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors returned by [`DirectoryClient`].
#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: StatusCode, detail: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Status { status, detail } => {
                write!(f, "directory returned {}: {}", status, detail)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl ClientError {
    /// HTTP status, if the service answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

/// Search body. Status uses its display form, e.g. "Not Started".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

/// Query-string paging and sorting.
#[derive(Debug, Clone, Serialize)]
pub struct PageOptions {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            sort_by: "id".to_string(),
            sort_order: "asc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Map<String, Value>>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeInput {
    pub firstname: String,
    pub lastname: String,
    pub contact: String,
    pub department: String,
    pub position: String,
    pub location: String,
    pub status: String,
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct Created {
    id: i64,
}

pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .pool_max_idle_per_host(0)
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let resp = self.client.get(format!("{}/health", self.base_url)).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Search the employees of `org_id`.
    pub async fn search(
        &self,
        org_id: &str,
        filters: &SearchFilters,
        page: &PageOptions,
    ) -> Result<SearchResponse, ClientError> {
        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-Org-Id", org_id)
            .query(page)
            .json(filters)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Add an employee owned by `org_id`; returns the new id.
    pub async fn add_employee(&self, org_id: &str, employee: &EmployeeInput) -> Result<i64, ClientError> {
        let resp = self
            .client
            .post(format!("{}/employees", self.base_url))
            .header("X-Org-Id", org_id)
            .json(employee)
            .send()
            .await?;
        let created: Created = Self::check(resp).await?.json().await?;
        Ok(created.id)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(text);
        Err(ClientError::Status { status, detail })
    }
}
