//! Health reporting: store liveness plus a cheap aggregate
//!
//! A failed ping makes the service unhealthy. A failed count does not; it
//! shows up as `user_count: -1`.

use serde::Serialize;

use crate::db::repos::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    Connected,
    Disconnected,
}

/// Health check response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub database: DatabaseState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Ping the store, then count users.
pub async fn check(users: &dyn UserStore) -> HealthReport {
    tracing::info!("Checking system health");

    if let Err(err) = users.ping().await {
        tracing::error!(error = %err, "Database ping failed");
        return HealthReport {
            status: HealthStatus::Unhealthy,
            database: DatabaseState::Disconnected,
            user_count: None,
            error: Some(err.to_string()),
        };
    }

    let user_count = users.count_all().await;
    tracing::info!(user_count, "System healthy");

    HealthReport {
        status: HealthStatus::Healthy,
        database: DatabaseState::Connected,
        user_count: Some(user_count),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::testing::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn healthy_reports_count() {
        let store = MemoryStore::default();
        store
            .insert(NewUser::new("Ada", "Lovelace", "555-0100", "ada@example.com"))
            .await
            .unwrap();

        let report = check(&store).await;
        assert!(report.is_healthy());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "status": "healthy", "database": "connected", "user_count": 1 })
        );
    }

    #[tokio::test]
    async fn count_failure_stays_healthy() {
        let store = MemoryStore::default();
        store.fail_count(true);

        let report = check(&store).await;
        assert!(report.is_healthy());
        assert_eq!(report.user_count, Some(-1));
    }

    #[tokio::test]
    async fn ping_failure_is_unhealthy() {
        let store = MemoryStore::default();
        store.fail_ping(true);

        let report = check(&store).await;
        assert!(!report.is_healthy());
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["database"], "disconnected");
        assert!(body["error"].is_string());
        assert!(body.get("user_count").is_none());
    }
}
