use serde::{Deserialize, Serialize};

/// Main configuration structure for coverage-sync
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// TestRail client configuration
    #[serde(default)]
    pub testrail: TestRailConfig,

    /// Jira client configuration
    #[serde(default)]
    pub jira: JiraConfig,

    /// Sync job configuration
    #[serde(default)]
    pub job: JobConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".coverage-sync/coverage-sync.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Also log to stderr when file output is enabled
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Rotation policy for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_console: true,
            rotation: default_rotation(),
        }
    }
}

/// TestRail client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TestRailConfig {
    /// Minimum spacing between two API calls. 333ms keeps a single job
    /// under TestRail's 180 requests/minute ceiling.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_min_request_interval_ms() -> u64 {
    333
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for TestRailConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: default_min_request_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Jira client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JiraConfig {
    /// Jira site, e.g. `https://example.atlassian.net`
    #[serde(default)]
    pub base_url: String,

    /// Account email used for basic auth
    #[serde(default)]
    pub email: String,

    /// API token (prefer `COVERAGE_SYNC_JIRA__API_TOKEN`)
    #[serde(default)]
    pub api_token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Sync job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobConfig {
    /// Wall-clock budget per invocation. Checked after each whole project.
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,

    /// Delay between invocations in daemon mode
    #[serde(default = "default_schedule_interval_secs")]
    pub schedule_interval_secs: u64,
}

const fn default_time_budget_secs() -> u64 {
    840
}

const fn default_schedule_interval_secs() -> u64 {
    3600
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget_secs(),
            schedule_interval_secs: default_schedule_interval_secs(),
        }
    }
}
