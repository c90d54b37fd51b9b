use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub username: FileUsernameConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Humantime string, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUsernameConfig {
    /// Humantime string, e.g. `"350ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_error: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Overrides read from the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_url: Option<String>,
    pub request_timeout: Option<String>,
    pub username_debounce: Option<String>,
    pub username_pattern: Option<String>,
    pub username_format_message: Option<String>,
    pub username_fallback_error: Option<String>,
    pub token: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: var("PLAZA_CONFIG").map(PathBuf::from),
            server_url: var("PLAZA_SERVER_URL"),
            request_timeout: var("PLAZA_REQUEST_TIMEOUT"),
            username_debounce: var("PLAZA_USERNAME_DEBOUNCE"),
            username_pattern: var("PLAZA_USERNAME_PATTERN"),
            username_format_message: var("PLAZA_USERNAME_FORMAT_MESSAGE"),
            username_fallback_error: var("PLAZA_USERNAME_FALLBACK_ERROR"),
            token: var("PLAZA_TOKEN"),
        }
    }
}

/// Unset and blank variables are treated the same.
fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
