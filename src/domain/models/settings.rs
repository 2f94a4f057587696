//! TestRail credentials and Jira destination fields, stored in the
//! key-value store and edited through `coverage-sync settings`.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Key under which the settings live in the key-value store.
pub const SETTINGS_KEY: &str = "syncSettings";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// TestRail user (usually an email address)
    #[serde(default)]
    pub user: String,
    /// TestRail API token
    #[serde(default)]
    pub token: String,
    /// TestRail site, e.g. `https://example.testrail.io`
    #[serde(default)]
    pub base_url: String,
    /// Jira custom field receiving the coverage percentage
    #[serde(default)]
    pub coverage_field_id: String,
    /// Jira custom field receiving the pass-rate percentage
    #[serde(default)]
    pub pass_rate_field_id: String,
}

impl SyncSettings {
    /// Trim every field so stray whitespace from a form or shell never
    /// reaches a request.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            user: self.user.trim().to_string(),
            token: self.token.trim().to_string(),
            base_url: self.base_url.trim().trim_end_matches('/').to_string(),
            coverage_field_id: self.coverage_field_id.trim().to_string(),
            pass_rate_field_id: self.pass_rate_field_id.trim().to_string(),
        }
    }

    /// Every field must be present; the base URL must be absolute http(s).
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("user", &self.user),
            ("token", &self.token),
            ("baseUrl", &self.base_url),
            ("coverageFieldId", &self.coverage_field_id),
            ("passRateFieldId", &self.pass_rate_field_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::MissingSetting(field));
            }
        }

        let url = Url::parse(self.base_url.trim()).map_err(|e| DomainError::InvalidSetting {
            field: "baseUrl",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidSetting {
                field: "baseUrl",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(())
    }

    /// Copy safe to print: the token is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            token: redact(&self.token),
            ..self.clone()
        }
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("user", &self.user)
            .field("token", &redact(&self.token))
            .field("base_url", &self.base_url)
            .field("coverage_field_id", &self.coverage_field_id)
            .field("pass_rate_field_id", &self.pass_rate_field_id)
            .finish()
    }
}
