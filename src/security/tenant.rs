//! Organization identifier checks.

/// Returns true when `org_id` is usable as a tenant boundary.
///
/// Only well-formedness is checked; organizations are not looked up in any
/// registry.
pub fn validate(org_id: &str) -> bool {
    !org_id.trim().is_empty()
}
