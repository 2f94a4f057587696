//! Shared fixtures for integration tests.

#![allow(dead_code)]

use coverage_sync::domain::models::config::{JiraConfig, TestRailConfig};
use coverage_sync::domain::models::SyncSettings;

/// `Basic` credentials for `qa@example.com:tr-token`.
pub const TESTRAIL_AUTH: &str = "Basic cWFAZXhhbXBsZS5jb206dHItdG9rZW4=";

/// `Basic` credentials for `bot@example.com:jira-token`.
pub const JIRA_AUTH: &str = "Basic Ym90QGV4YW1wbGUuY29tOmppcmEtdG9rZW4=";

pub const COVERAGE_FIELD: &str = "customfield_11969";
pub const PASS_RATE_FIELD: &str = "customfield_11999";

/// Settings pointing TestRail at `base_url`.
pub fn settings(base_url: &str) -> SyncSettings {
    SyncSettings {
        user: "qa@example.com".to_string(),
        token: "tr-token".to_string(),
        base_url: base_url.to_string(),
        coverage_field_id: COVERAGE_FIELD.to_string(),
        pass_rate_field_id: PASS_RATE_FIELD.to_string(),
    }
}

/// No request spacing; mock servers run on the real clock.
pub fn unthrottled() -> TestRailConfig {
    TestRailConfig {
        min_request_interval_ms: 0,
        request_timeout_secs: 5,
    }
}

pub fn jira_config(base_url: &str) -> JiraConfig {
    JiraConfig {
        base_url: base_url.to_string(),
        email: "bot@example.com".to_string(),
        api_token: "jira-token".to_string(),
        request_timeout_secs: 5,
    }
}

/// API path for a TestRail method, as the client requests it.
pub fn api(method: &str) -> String {
    format!("/index.php?/api/v2/{method}")
}

/// First page of a paginated TestRail method.
pub fn first_page(method: &str) -> String {
    api(&format!("{method}&limit=250&offset=0"))
}

/// Initialize a test subscriber once per binary.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
