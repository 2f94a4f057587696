//! TestRail HTTP client with request spacing.
//!
//! Every call is a single authenticated GET against
//! `{base_url}/index.php?/api/v2/{endpoint}`. Calls are admitted no
//! closer together than the configured interval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::TestRailConfig;
use crate::domain::models::settings::SyncSettings;
use crate::domain::ports::TestManagementClient;

/// Path TestRail routes API v2 calls through.
const API_PATH: &str = "/index.php?/api/v2/";

/// Minimum-interval gate.
///
/// [`acquire`](RequestSpacer::acquire) returns once at least `interval`
/// has passed since the previously admitted call. The delay is fixed,
/// not adaptive to response headers.
#[derive(Debug)]
pub struct RequestSpacer {
    /// Minimum distance between two admitted calls.
    interval: Duration,
    /// When the previous call was admitted.
    last_admitted: Option<Instant>,
}

impl RequestSpacer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Wait for the next slot, then claim it.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_admitted {
            let ready_at = last + self.interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_admitted = Some(Instant::now());
    }
}

/// HTTP client for the TestRail REST API v2.
#[derive(Clone)]
pub struct TestRailClient {
    /// The underlying HTTP client.
    http: Client,
    /// `{base_url}/index.php?/api/v2/`
    api_base: String,
    user: String,
    token: String,
    /// Shared so clones of the client respect the same spacing.
    spacer: Arc<Mutex<RequestSpacer>>,
}

impl std::fmt::Debug for TestRailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRailClient")
            .field("api_base", &self.api_base)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl TestRailClient {
    /// Build a client from validated sync settings.
    pub fn new(settings: &SyncSettings, config: &TestRailConfig) -> DomainResult<Self> {
        settings.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coverage-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("TestRail HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: format!("{}{API_PATH}", settings.base_url.trim().trim_end_matches('/')),
            user: settings.user.trim().to_string(),
            token: settings.token.trim().to_string(),
            spacer: Arc::new(Mutex::new(RequestSpacer::new(Duration::from_millis(
                config.min_request_interval_ms,
            )))),
        })
    }

    /// Full URL for an API method such as `get_plan/12`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl TestManagementClient for TestRailClient {
    async fn fetch(&self, endpoint: &str) -> DomainResult<Value> {
        let url = self.endpoint_url(endpoint);

        self.spacer.lock().await.acquire().await;
        tracing::debug!(endpoint, "TestRail request");

        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::UpstreamTransport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(endpoint, status = status.as_u16(), body = %body, "TestRail request failed");
            return Err(DomainError::UpstreamRequest {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>().await.map_err(|e| {
            DomainError::SerializationError(format!("TestRail {endpoint} parse failed: {e}"))
        })
    }
}
