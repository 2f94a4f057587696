//! Jira HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{Map, Value};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::JiraConfig;
use crate::domain::ports::IssueTracker;

use super::models::JiraIssueUpdateRequest;

/// HTTP client for the Jira Cloud REST API v3.
///
/// Authenticates with basic auth (`email:api_token`). Write failures map
/// to [`DomainError::IssueUpdateFailed`] so callers can skip the issue
/// and carry on.
#[derive(Clone)]
pub struct JiraClient {
    http: Client,
    base_url: Url,
    email: String,
    api_token: String,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Build a client; every connection value must be present.
    pub fn new(config: &JiraConfig) -> DomainResult<Self> {
        let required = [
            ("jira.base_url", &config.base_url),
            ("jira.email", &config.email),
            ("jira.api_token", &config.api_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationFailed(format!(
                    "{name} is not configured"
                )));
            }
        }

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| DomainError::ValidationFailed(format!("jira.base_url is invalid: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::ValidationFailed(format!(
                "jira.base_url cannot be used as a base: {base_url}"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coverage-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("Jira HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            email: config.email.trim().to_string(),
            api_token: config.api_token.trim().to_string(),
        })
    }

    /// `{base}/rest/api/3/issue/{key}` with the key percent-encoded as one segment.
    pub fn issue_url(&self, issue_key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["rest", "api", "3", "issue", issue_key]);
        }
        url
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn update_fields(&self, issue_key: &str, fields: Map<String, Value>) -> DomainResult<()> {
        let url = self.issue_url(issue_key);
        let body = JiraIssueUpdateRequest { fields };

        let resp = self
            .http
            .put(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::IssueUpdateFailed {
                issue_key: issue_key.to_string(),
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(DomainError::IssueUpdateFailed {
                issue_key: issue_key.to_string(),
                message: format!("Jira returned {status}: {body_text}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JiraConfig {
        JiraConfig {
            base_url: "https://example.atlassian.net".to_string(),
            email: "bot@example.com".to_string(),
            api_token: "jira-token".to_string(),
            ..JiraConfig::default()
        }
    }

    #[test]
    fn test_issue_url() {
        let client = JiraClient::new(&config()).unwrap();
        assert_eq!(
            client.issue_url("ABC-12").as_str(),
            "https://example.atlassian.net/rest/api/3/issue/ABC-12"
        );
    }

    #[test]
    fn test_issue_url_with_path_prefix_and_trailing_slash() {
        let client = JiraClient::new(&JiraConfig {
            base_url: "https://example.com/jira/".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(
            client.issue_url("ABC-12").as_str(),
            "https://example.com/jira/rest/api/3/issue/ABC-12"
        );
    }

    #[test]
    fn test_issue_key_is_encoded_as_single_segment() {
        let client = JiraClient::new(&config()).unwrap();
        let url = client.issue_url("ABC/1");
        assert!(url.as_str().ends_with("/issue/ABC%2F1"), "got {url}");
    }

    #[test]
    fn test_missing_connection_values() {
        for broken in [
            JiraConfig { base_url: String::new(), ..config() },
            JiraConfig { email: " ".to_string(), ..config() },
            JiraConfig { api_token: String::new(), ..config() },
        ] {
            assert!(matches!(
                JiraClient::new(&broken),
                Err(DomainError::ValidationFailed(_))
            ));
        }
    }

    #[test]
    fn test_debug_omits_token() {
        let client = JiraClient::new(&config()).unwrap();
        assert!(!format!("{client:?}").contains("jira-token"));
    }
}
