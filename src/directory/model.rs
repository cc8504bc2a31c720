//! Employee records and their flat output form.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::directory::error::DirectoryError;

/// A flat column → value mapping as returned to callers, in insertion order.
pub type Row = Map<String, Value>;

/// Columns every materialized row carries before projection.
pub const STANDARD_FIELDS: [&str; 9] = [
    "id",
    "org_id",
    "firstname",
    "lastname",
    "contact",
    "department",
    "position",
    "location",
    "status",
];

/// Employment status.
///
/// Stored and serialized as its scalar form (`"Not Started"`), never as the
/// variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "Not Started", alias = "NotStarted")]
    NotStarted,
    #[serde(rename = "Terminated")]
    Terminated,
}

impl EmployeeStatus {
    /// Scalar representation used in storage and on the wire.
    pub fn as_scalar(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::NotStarted => "Not Started",
            EmployeeStatus::Terminated => "Terminated",
        }
    }

    /// Inverse of [`EmployeeStatus::as_scalar`].
    pub fn from_scalar(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(EmployeeStatus::Active),
            "Not Started" => Some(EmployeeStatus::NotStarted),
            "Terminated" => Some(EmployeeStatus::Terminated),
            _ => None,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_scalar())
    }
}

/// Unrecognized status text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown employee status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EmployeeStatus {
    type Err = UnknownStatus;

    /// Accepts the scalar form or the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmployeeStatus::from_scalar(s)
            .or_else(|| (s == "NotStarted").then_some(EmployeeStatus::NotStarted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl ToSql for EmployeeStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_scalar()))
    }
}

impl FromSql for EmployeeStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        EmployeeStatus::from_scalar(text)
            .ok_or_else(|| FromSqlError::Other(Box::new(UnknownStatus(text.to_string()))))
    }
}

/// A stored employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub org_id: String,
    pub firstname: String,
    pub lastname: String,
    pub contact: String,
    pub department: String,
    pub position: String,
    pub location: String,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Employee {
    /// Flatten into a row: standard fields, then custom fields that do not
    /// shadow a standard one.
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), Value::from(self.id));
        row.insert("org_id".into(), Value::String(self.org_id));
        row.insert("firstname".into(), Value::String(self.firstname));
        row.insert("lastname".into(), Value::String(self.lastname));
        row.insert("contact".into(), Value::String(self.contact));
        row.insert("department".into(), Value::String(self.department));
        row.insert("position".into(), Value::String(self.position));
        row.insert("location".into(), Value::String(self.location));
        row.insert("status".into(), Value::String(self.status.as_scalar().into()));
        for (key, value) in self.extra {
            if !row.contains_key(&key) {
                row.insert(key, value);
            }
        }
        row
    }
}

/// An employee about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub org_id: String,
    pub firstname: String,
    pub lastname: String,
    pub contact: String,
    pub department: String,
    pub position: String,
    pub location: String,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl NewEmployee {
    /// Reject records that cannot be stored faithfully.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.org_id.trim().is_empty() {
            return Err(DirectoryError::InvalidEmployee("org_id must not be empty".into()));
        }
        for (key, value) in &self.extra {
            if STANDARD_FIELDS.contains(&key.as_str()) || key == "extra" {
                return Err(DirectoryError::InvalidEmployee(format!(
                    "custom field '{}' collides with a standard field",
                    key
                )));
            }
            if value.is_array() || value.is_object() {
                return Err(DirectoryError::InvalidEmployee(format!(
                    "custom field '{}' must be a scalar",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Request body for adding an employee; the owner comes from the caller context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayload {
    pub firstname: String,
    pub lastname: String,
    pub contact: String,
    pub department: String,
    pub position: String,
    pub location: String,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl EmployeePayload {
    pub fn into_employee(self, org_id: impl Into<String>) -> NewEmployee {
        NewEmployee {
            org_id: org_id.into(),
            firstname: self.firstname,
            lastname: self.lastname,
            contact: self.contact,
            department: self.department,
            position: self.position,
            location: self.location,
            status: self.status,
            extra: self.extra,
        }
    }
}
