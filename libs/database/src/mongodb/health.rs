use mongodb::{Client, bson::Document, bson::doc};
use std::time::Instant;

use crate::common::{DatabaseError, DatabaseResult};

/// Result of a `hello` round trip
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Replica set name, `None` for a standalone server
    pub replica_set: Option<String>,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// Change streams need a replica set or a sharded cluster
    pub fn supports_change_streams(&self) -> bool {
        self.healthy && self.replica_set.is_some()
    }
}

/// Deployment topology as reported by `hello`: the replica set name, or
/// `"mongos"` for a sharded cluster router
pub fn topology_name(hello: &Document) -> Option<String> {
    if let Ok(name) = hello.get_str("setName") {
        return Some(name.to_string());
    }
    match hello.get_str("msg") {
        Ok("isdbgrid") => Some("mongos".to_string()),
        _ => None,
    }
}

pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let reply = client
        .database("admin")
        .run_command(doc! { "hello": 1 })
        .await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match reply {
        Ok(hello) => HealthStatus {
            healthy: true,
            replica_set: topology_name(&hello),
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            replica_set: None,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

/// Fail early when the deployment cannot serve live queries.
/// Returns the replica set (or `mongos`) name.
pub async fn ensure_change_streams(client: &Client) -> DatabaseResult<String> {
    let status = check_health_detailed(client).await;

    if !status.healthy {
        return Err(DatabaseError::HealthCheckFailed(
            status.message.unwrap_or_default(),
        ));
    }
    status.replica_set.ok_or_else(|| {
        DatabaseError::ChangeStreamsUnavailable(
            "server is standalone; start it as a replica set".to_string(),
        )
    })
}
