//! Search inputs: the fixed filter set, sorting, and page normalization.

use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::directory::model::EmployeeStatus;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Columns that may carry an equality filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Firstname,
    Lastname,
    Contact,
    Department,
    Position,
    Location,
    Status,
}

impl FilterField {
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Firstname => "firstname",
            FilterField::Lastname => "lastname",
            FilterField::Contact => "contact",
            FilterField::Department => "department",
            FilterField::Position => "position",
            FilterField::Location => "location",
            FilterField::Status => "status",
        }
    }
}

/// One optional value per filterable field; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub contact: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl SearchFilters {
    /// Present constraints in a fixed column order, as bindable values.
    pub fn predicates(&self) -> Vec<(FilterField, Value)> {
        let text = [
            (FilterField::Firstname, &self.firstname),
            (FilterField::Lastname, &self.lastname),
            (FilterField::Contact, &self.contact),
            (FilterField::Department, &self.department),
            (FilterField::Position, &self.position),
            (FilterField::Location, &self.location),
        ];

        let mut predicates: Vec<_> = text
            .into_iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, Value::Text(v.clone()))))
            .collect();
        if let Some(status) = self.status {
            predicates.push((FilterField::Status, Value::Text(status.as_scalar().to_string())));
        }
        predicates
    }
}

/// Search request body. Fields outside the filter set are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub filters: SearchFilters,

    /// Output columns to keep; absent or empty keeps everything.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// Columns results may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    Firstname,
    Lastname,
    Department,
    Position,
    Location,
    Status,
}

impl SortColumn {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortColumn::Id),
            "firstname" => Some(SortColumn::Firstname),
            "lastname" => Some(SortColumn::Lastname),
            "department" => Some(SortColumn::Department),
            "position" => Some(SortColumn::Position),
            "location" => Some(SortColumn::Location),
            "status" => Some(SortColumn::Status),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Firstname => "firstname",
            SortColumn::Lastname => "lastname",
            SortColumn::Department => "department",
            SortColumn::Position => "position",
            SortColumn::Location => "location",
            SortColumn::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` in any case is descending; everything else ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination and sorting exactly as the caller sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE as i64,
            sort_by: "id".to_string(),
            sort_order: "asc".to_string(),
        }
    }
}

/// Pagination and sorting after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
}

impl Paging {
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortColumn::Id,
            sort_order: SortOrder::Asc,
        }
    }
}

/// A value replaced during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    Page(i64),
    PageSize(i64),
    SortBy(String),
    SortOrder(String),
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::Page(p) => write!(f, "invalid page {}, defaulting to 1", p),
            Adjustment::PageSize(s) => {
                write!(f, "invalid page_size {}, defaulting to {}", s, DEFAULT_PAGE_SIZE)
            }
            Adjustment::SortBy(s) => write!(f, "invalid sort_by '{}', defaulting to 'id'", s),
            Adjustment::SortOrder(s) => write!(f, "invalid sort_order '{}', defaulting to 'asc'", s),
        }
    }
}

/// Clamp raw pagination and sorting to safe values. Never fails.
pub fn normalize(raw: &PageRequest) -> (Paging, Vec<Adjustment>) {
    let mut adjustments = Vec::new();

    let page = if raw.page < 1 {
        adjustments.push(Adjustment::Page(raw.page));
        1
    } else {
        u32::try_from(raw.page).unwrap_or(u32::MAX)
    };

    let page_size = match u32::try_from(raw.page_size) {
        Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
        _ => {
            adjustments.push(Adjustment::PageSize(raw.page_size));
            DEFAULT_PAGE_SIZE
        }
    };

    let sort_by = SortColumn::parse(&raw.sort_by).unwrap_or_else(|| {
        adjustments.push(Adjustment::SortBy(raw.sort_by.clone()));
        SortColumn::Id
    });

    let sort_order = SortOrder::parse(&raw.sort_order);
    if sort_order == SortOrder::Asc && !raw.sort_order.eq_ignore_ascii_case("asc") {
        adjustments.push(Adjustment::SortOrder(raw.sort_order.clone()));
    }

    (
        Paging {
            page,
            page_size,
            sort_by,
            sort_order,
        },
        adjustments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(page: i64, page_size: i64, sort_by: &str, sort_order: &str) -> PageRequest {
        PageRequest {
            page,
            page_size,
            sort_by: sort_by.into(),
            sort_order: sort_order.into(),
        }
    }

    #[test]
    fn test_valid_input_untouched() {
        let (paging, adjustments) = normalize(&raw(3, 50, "lastname", "DESC"));
        assert!(adjustments.is_empty());
        assert_eq!(paging.page, 3);
        assert_eq!(paging.page_size, 50);
        assert_eq!(paging.sort_by, SortColumn::Lastname);
        assert_eq!(paging.sort_order, SortOrder::Desc);
        assert_eq!(paging.offset(), 100);
        assert_eq!(paging.limit(), 50);
    }

    #[test]
    fn test_page_clamped_to_one() {
        for page in [0, -5, i64::MIN] {
            let (paging, adjustments) = normalize(&raw(page, 20, "id", "asc"));
            assert_eq!(paging.page, 1);
            assert_eq!(adjustments, vec![Adjustment::Page(page)]);
        }
    }

    #[test]
    fn test_page_size_out_of_range_becomes_default() {
        for size in [0, -1, 101, 10_000] {
            let (paging, _) = normalize(&raw(1, size, "id", "asc"));
            assert_eq!(paging.page_size, DEFAULT_PAGE_SIZE);
        }
        assert_eq!(normalize(&raw(1, 1, "id", "asc")).0.page_size, 1);
        assert_eq!(normalize(&raw(1, 100, "id", "asc")).0.page_size, 100);
    }

    #[test]
    fn test_sort_by_outside_allow_list_becomes_id() {
        for column in ["contact", "org_id", "id; DROP TABLE employees", "ID", ""] {
            let (paging, adjustments) = normalize(&raw(1, 20, column, "asc"));
            assert_eq!(paging.sort_by, SortColumn::Id);
            assert_eq!(adjustments, vec![Adjustment::SortBy(column.to_string())]);
        }
    }

    #[test]
    fn test_sort_order_only_desc_descends() {
        assert_eq!(normalize(&raw(1, 20, "id", "Desc")).0.sort_order, SortOrder::Desc);
        let (paging, adjustments) = normalize(&raw(1, 20, "id", "descending"));
        assert_eq!(paging.sort_order, SortOrder::Asc);
        assert_eq!(adjustments.len(), 1);
        assert!(normalize(&raw(1, 20, "id", "ASC")).1.is_empty());
    }

    #[test]
    fn test_predicates_bind_status_scalar() {
        let filters = SearchFilters {
            lastname: Some("Doe".into()),
            status: Some(EmployeeStatus::NotStarted),
            ..SearchFilters::default()
        };
        let predicates = filters.predicates();
        assert_eq!(
            predicates,
            vec![
                (FilterField::Lastname, Value::Text("Doe".into())),
                (FilterField::Status, Value::Text("Not Started".into())),
            ]
        );
    }

    #[test]
    fn test_request_body_ignores_unknown_fields() {
        let request: SearchRequest = serde_json::from_value(json!({
            "firstname": "John",
            "status": "Active",
            "org_id": "someone_else",
            "salary": 100,
            "columns": ["firstname", "lastname"]
        }))
        .unwrap();

        assert_eq!(request.filters.firstname.as_deref(), Some("John"));
        assert_eq!(request.filters.status, Some(EmployeeStatus::Active));
        assert_eq!(request.filters.predicates().len(), 2);
        assert_eq!(
            request.columns,
            Some(vec!["firstname".to_string(), "lastname".to_string()])
        );
    }
}
