//! Rust client for the employee directory HTTP API.

pub mod client;

pub use client::{
    ClientError, DirectoryClient, EmployeeInput, PageOptions, SearchFilters, SearchResponse,
};
