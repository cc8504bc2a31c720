//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use employee_directory::config::ServiceConfig;
use employee_directory::http::HttpServer;
use employee_directory::lifecycle::{startup, Shutdown};
use sdk_rust::EmployeeInput;
use serde_json::Map;
use tokio::sync::mpsc;

/// Start the directory on `addr` with an in-memory store.
///
/// Returns the shutdown handle and a sender for live configuration updates.
#[allow(dead_code)]
pub async fn start_directory(
    addr: SocketAddr,
    requests_per_window: u32,
) -> (Shutdown, mpsc::UnboundedSender<ServiceConfig>) {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = addr.to_string();
    config.rate_limit.requests_per_window = requests_per_window;

    let service = startup::build_service(&config).unwrap();
    let server = HttpServer::new(config, service);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    (shutdown, updates_tx)
}

#[allow(dead_code)]
pub fn employee(first: &str, last: &str, department: &str, status: &str) -> EmployeeInput {
    EmployeeInput {
        firstname: first.into(),
        lastname: last.into(),
        contact: "1234567890".into(),
        department: department.into(),
        position: "Engineer".into(),
        location: "NY".into(),
        status: status.into(),
        extra: Map::new(),
    }
}
