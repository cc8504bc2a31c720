//! Employee search and insert against the store.

use std::time::Instant;

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::directory::error::DirectoryError;
use crate::directory::model::{Employee, NewEmployee, Row};
use crate::directory::query::EmployeeQuery;
use crate::directory::request::{normalize, PageRequest, SearchFilters};
use crate::observability::metrics;
use crate::storage::{Database, StorageResult};

const INSERT_EMPLOYEE: &str = "
    INSERT INTO employees (org_id, firstname, lastname, contact, department, position, location, status, extra)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

/// One page of results plus the number of matches across all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Row>,
    pub total: u64,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Runs tenant-scoped searches and inserts, one pooled connection per call.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    db: Database,
}

impl SearchEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Search `org_id`'s employees.
    ///
    /// Bad pagination or sorting is normalized, never rejected. Storage
    /// failures are logged and yield an empty page, so an outage is
    /// indistinguishable from "no matches" for the caller.
    pub fn search(
        &self,
        org_id: &str,
        filters: &SearchFilters,
        columns: Option<&[String]>,
        page: &PageRequest,
    ) -> SearchPage {
        let start = Instant::now();
        if org_id.is_empty() {
            tracing::error!("Search called without an organization");
            metrics::record_search("invalid", 0, start);
            return SearchPage::empty();
        }

        let (paging, adjustments) = normalize(page);
        for adjustment in &adjustments {
            tracing::warn!(org_id = %org_id, "search: {}", adjustment);
        }

        let query = EmployeeQuery::new(org_id, filters, &paging);
        match self.run(&query) {
            Ok((employees, total)) => {
                let results: Vec<Row> = employees
                    .into_iter()
                    .map(|employee| project(employee.into_row(), columns))
                    .collect();
                tracing::info!(
                    org_id = %org_id,
                    results = results.len(),
                    total,
                    page = paging.page,
                    page_size = paging.page_size,
                    sort_by = paging.sort_by.column(),
                    sort_order = paging.sort_order.keyword(),
                    "Search completed"
                );
                metrics::record_search("ok", results.len(), start);
                SearchPage { results, total }
            }
            Err(e) => {
                tracing::error!(org_id = %org_id, error = %e, "Failed to search employees");
                metrics::record_storage_error("search");
                metrics::record_search("storage_error", 0, start);
                SearchPage::empty()
            }
        }
    }

    fn run(&self, query: &EmployeeQuery) -> StorageResult<(Vec<Employee>, u64)> {
        let conn = self.db.connection()?;

        let mut stmt = conn.prepare(&query.select_sql())?;
        let employees = stmt
            .query_map(params_from_iter(query.select_params()), read_employee)?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = conn.query_row(
            &query.count_sql(),
            params_from_iter(query.count_params()),
            |row| row.get(0),
        )?;

        Ok((employees, u64::try_from(total).unwrap_or(0)))
    }

    /// Insert a new employee and return its id.
    ///
    /// Invalid records are rejected before touching storage; storage failures
    /// roll the transaction back and are returned.
    pub fn add(&self, employee: &NewEmployee) -> Result<i64, DirectoryError> {
        if let Err(e) = employee.validate() {
            tracing::error!(org_id = %employee.org_id, error = %e, "add_employee: rejected record");
            return Err(e);
        }

        let result = self
            .db
            .connection()
            .and_then(|mut conn| insert_employee(&mut conn, employee));

        match result {
            Ok(id) => {
                tracing::info!(
                    id,
                    org_id = %employee.org_id,
                    "Employee {} {} added",
                    employee.firstname,
                    employee.lastname
                );
                metrics::record_employee_added();
                Ok(id)
            }
            Err(e) => {
                tracing::error!(org_id = %employee.org_id, error = %e, "Failed to add employee");
                metrics::record_storage_error("add");
                Err(e.into())
            }
        }
    }
}

fn insert_employee(conn: &mut rusqlite::Connection, employee: &NewEmployee) -> StorageResult<i64> {
    let extra = serde_json::to_string(&employee.extra)?;
    let tx = conn.transaction()?;

    let inserted = tx.execute(
        INSERT_EMPLOYEE,
        params![
            employee.org_id,
            employee.firstname,
            employee.lastname,
            employee.contact,
            employee.department,
            employee.position,
            employee.location,
            employee.status,
            extra,
        ],
    );

    match inserted {
        Ok(_) => {
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback() {
                tracing::warn!(error = %rollback, "Rollback failed");
            }
            Err(e.into())
        }
    }
}

fn read_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    let extra: String = row.get(9)?;
    let extra = serde_json::from_str(&extra)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(Employee {
        id: row.get(0)?,
        org_id: row.get(1)?,
        firstname: row.get(2)?,
        lastname: row.get(3)?,
        contact: row.get(4)?,
        department: row.get(5)?,
        position: row.get(6)?,
        location: row.get(7)?,
        status: row.get(8)?,
        extra,
    })
}

/// Keep only the requested columns; unknown names are ignored.
pub fn project(mut row: Row, columns: Option<&[String]>) -> Row {
    if let Some(columns) = columns.filter(|c| !c.is_empty()) {
        row.retain(|key, _| columns.iter().any(|c| c == key));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::model::EmployeeStatus;
    use serde_json::{json, Map};

    fn engine() -> SearchEngine {
        let db = Database::in_memory().unwrap();
        db.init_schema().unwrap();
        SearchEngine::new(db)
    }

    fn employee(org: &str, first: &str, last: &str, department: &str, status: EmployeeStatus) -> NewEmployee {
        NewEmployee {
            org_id: org.into(),
            firstname: first.into(),
            lastname: last.into(),
            contact: "1234567890".into(),
            department: department.into(),
            position: "Engineer".into(),
            location: "NY".into(),
            status,
            extra: Map::new(),
        }
    }

    fn by_first(first: &str) -> SearchFilters {
        SearchFilters {
            firstname: Some(first.into()),
            ..SearchFilters::default()
        }
    }

    #[test]
    fn test_add_and_search_employee() {
        let engine = engine();
        engine
            .add(&employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active))
            .unwrap();

        let page = engine.search("org_test", &by_first("John"), None, &PageRequest::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0]["lastname"], json!("Doe"));
        assert_eq!(page.results[0]["status"], json!("Active"));
    }

    #[test]
    fn test_multi_tenant_safety() {
        let engine = engine();
        engine
            .add(&employee("org_other", "Jane", "Smith", "IT", EmployeeStatus::Active))
            .unwrap();
        engine
            .add(&employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active))
            .unwrap();

        let filters = SearchFilters {
            firstname: Some("Jane".into()),
            lastname: Some("Smith".into()),
            ..SearchFilters::default()
        };
        let page = engine.search("org_test", &filters, None, &PageRequest::default());
        assert!(page.results.is_empty());
        assert_eq!(page.total, 0);

        let everything = engine.search("org_test", &SearchFilters::default(), None, &PageRequest::default());
        assert_eq!(everything.total, 1);
        assert!(everything.results.iter().all(|r| r["org_id"] == json!("org_test")));
    }

    #[test]
    fn test_total_spans_pages_and_sorting_applies() {
        let engine = engine();
        for last in ["Adams", "Baker", "Clark", "Davis", "Evans"] {
            engine
                .add(&employee("org_test", "Sam", last, "HR", EmployeeStatus::Active))
                .unwrap();
        }
        engine
            .add(&employee("org_test", "Sam", "Fisher", "IT", EmployeeStatus::Active))
            .unwrap();

        let filters = SearchFilters {
            department: Some("HR".into()),
            ..SearchFilters::default()
        };
        let page = PageRequest {
            page: 2,
            page_size: 2,
            sort_by: "lastname".into(),
            sort_order: "desc".into(),
        };
        let result = engine.search("org_test", &filters, None, &page);

        assert_eq!(result.total, 5);
        let names: Vec<_> = result.results.iter().map(|r| r["lastname"].clone()).collect();
        assert_eq!(names, vec![json!("Clark"), json!("Baker")]);

        let past_end = PageRequest { page: 9, ..page };
        let result = engine.search("org_test", &filters, None, &past_end);
        assert!(result.results.is_empty());
        assert_eq!(result.total, 5);
    }

    #[test]
    fn test_status_filter_uses_scalar() {
        let engine = engine();
        engine
            .add(&employee("org_test", "Ann", "Lee", "HR", EmployeeStatus::NotStarted))
            .unwrap();
        engine
            .add(&employee("org_test", "Bob", "Ray", "HR", EmployeeStatus::Terminated))
            .unwrap();

        let filters = SearchFilters {
            status: Some(EmployeeStatus::NotStarted),
            ..SearchFilters::default()
        };
        let page = engine.search("org_test", &filters, None, &PageRequest::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0]["status"], json!("Not Started"));
    }

    #[test]
    fn test_projection_keeps_only_requested_columns() {
        let engine = engine();
        let mut record = employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active);
        record.extra.insert("badge".into(), json!("B-7"));
        engine.add(&record).unwrap();

        let columns = vec!["firstname".to_string(), "badge".to_string(), "salary".to_string()];
        let page = engine.search("org_test", &by_first("John"), Some(&columns), &PageRequest::default());
        let row = &page.results[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row["firstname"], json!("John"));
        assert_eq!(row["badge"], json!("B-7"));

        let empty: Vec<String> = Vec::new();
        let page = engine.search("org_test", &by_first("John"), Some(&empty), &PageRequest::default());
        assert!(page.results[0].contains_key("contact"));
        assert!(page.results[0].contains_key("badge"));
    }

    #[test]
    fn test_bad_paging_is_normalized() {
        let engine = engine();
        for first in ["A", "B", "C"] {
            engine
                .add(&employee("org_test", first, "Doe", "HR", EmployeeStatus::Active))
                .unwrap();
        }
        let page = PageRequest {
            page: -3,
            page_size: 500,
            sort_by: "contact; DROP TABLE employees".into(),
            sort_order: "sideways".into(),
        };
        let result = engine.search("org_test", &SearchFilters::default(), None, &page);
        assert_eq!(result.total, 3);
        let ids: Vec<_> = result.results.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_empty_org_returns_nothing() {
        let engine = engine();
        engine
            .add(&employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active))
            .unwrap();
        assert_eq!(
            engine.search("", &SearchFilters::default(), None, &PageRequest::default()),
            SearchPage::empty()
        );
    }

    #[test]
    fn test_storage_failure_fails_empty_on_read() {
        // No schema: every query fails.
        let engine = SearchEngine::new(Database::in_memory().unwrap());
        let page = engine.search("org_test", &by_first("John"), None, &PageRequest::default());
        assert_eq!(page, SearchPage::empty());
    }

    #[test]
    fn test_storage_failure_propagates_on_write() {
        let engine = SearchEngine::new(Database::in_memory().unwrap());
        let err = engine
            .add(&employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Storage(_)));
    }

    #[test]
    fn test_invalid_record_rejected_before_storage() {
        let engine = SearchEngine::new(Database::in_memory().unwrap());
        let record = employee("", "John", "Doe", "HR", EmployeeStatus::Active);
        assert!(matches!(engine.add(&record), Err(DirectoryError::InvalidEmployee(_))));
    }

    #[test]
    fn test_rows_keep_standard_then_custom_order() {
        let engine = engine();
        let mut record = employee("org_test", "John", "Doe", "HR", EmployeeStatus::Active);
        record.extra.insert("zeta".into(), json!(1));
        record.extra.insert("aaa".into(), json!("B-1"));
        engine.add(&record).unwrap();

        let page = engine.search("org_test", &by_first("John"), None, &PageRequest::default());
        let keys: Vec<&str> = page.results[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "id", "org_id", "firstname", "lastname", "contact", "department", "position",
                "location", "status", "zeta", "aaa",
            ]
        );

        let body = serde_json::to_string(&page.results[0]).unwrap();
        assert!(body.starts_with(r#"{"id":"#));
    }

    #[test]
    fn test_project_without_columns_is_identity() {
        let mut row = Row::new();
        row.insert("id".into(), json!(1));
        assert_eq!(project(row.clone(), None), row);
    }
}
