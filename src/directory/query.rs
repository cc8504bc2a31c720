//! Tenant-scoped SQL construction.
//!
//! Every statement starts from `org_id = ?1`. Filter values are always bound
//! as parameters; the only identifiers spliced into SQL come from the closed
//! [`FilterField`] and [`SortColumn`] enums.
//!
//! [`FilterField`]: crate::directory::request::FilterField
//! [`SortColumn`]: crate::directory::request::SortColumn

use rusqlite::types::Value;

use crate::directory::request::{Paging, SearchFilters};

/// Columns selected for row materialization, in read order.
pub const SELECT_COLUMNS: &str =
    "id, org_id, firstname, lastname, contact, department, position, location, status, extra";

/// A search compiled to a page query and a count query sharing one predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeQuery {
    predicate: String,
    params: Vec<Value>,
    order_by: String,
    limit: i64,
    offset: i64,
}

impl EmployeeQuery {
    pub fn new(org_id: &str, filters: &SearchFilters, paging: &Paging) -> Self {
        let mut predicate = String::from("org_id = ?1");
        let mut params = vec![Value::Text(org_id.to_string())];

        for (field, value) in filters.predicates() {
            params.push(value);
            predicate.push_str(&format!(" AND {} = ?{}", field.column(), params.len()));
        }

        Self {
            predicate,
            params,
            order_by: format!("{} {}", paging.sort_by.column(), paging.sort_order.keyword()),
            limit: paging.limit(),
            offset: paging.offset(),
        }
    }

    /// Page query: filtered, ordered, limited.
    pub fn select_sql(&self) -> String {
        let limit_idx = self.params.len() + 1;
        format!(
            "SELECT {} FROM employees WHERE {} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            SELECT_COLUMNS,
            self.predicate,
            self.order_by,
            limit_idx,
            limit_idx + 1
        )
    }

    /// Parameters for [`EmployeeQuery::select_sql`].
    pub fn select_params(&self) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(self.limit));
        params.push(Value::Integer(self.offset));
        params
    }

    /// Count of every match, ignoring ordering and pagination.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM employees WHERE {}", self.predicate)
    }

    /// Parameters for [`EmployeeQuery::count_sql`].
    pub fn count_params(&self) -> &[Value] {
        &self.params
    }
}
