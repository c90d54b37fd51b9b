use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use plaza_core::{
    CandidateRule, DEFAULT_USERNAME_MESSAGE, DEFAULT_USERNAME_PATTERN,
    RegexRule, UsernameRule,
};
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USERNAME_DEBOUNCE: Duration = Duration::from_millis(350);
pub const DEFAULT_FALLBACK_ERROR: &str = "Could not check username right now";

/// Fully resolved client configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub username: UsernameCheckConfig,
    pub auth: AuthConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub url: Url,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_SERVER_URL)
                .expect("default server url should parse"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Tuning for the debounced username availability check.
#[derive(Debug, Clone)]
pub struct UsernameCheckConfig {
    /// Quiet period after the last keystroke before the server is asked.
    pub debounce: Duration,
    /// Local regex applied before any network call.
    pub pattern: String,
    /// Message shown when `pattern` does not match.
    pub format_message: String,
    /// Message shown when the server gives no explanation for a failure.
    pub fallback_error: String,
}

impl Default for UsernameCheckConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_USERNAME_DEBOUNCE,
            pattern: DEFAULT_USERNAME_PATTERN.to_string(),
            format_message: DEFAULT_USERNAME_MESSAGE.to_string(),
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }
}

impl UsernameCheckConfig {
    /// Build the local format rule. The pattern is validated during loading,
    /// so this only fails for hand-built configs.
    pub fn rule(&self) -> Result<UsernameRule, regex::Error> {
        let pattern = RegexRule::new(&self.pattern, self.format_message.clone())?;
        Ok(UsernameRule::new(pattern))
    }

    /// Shared form for callers that hand one rule to several checkers.
    pub fn shared_rule(
        &self,
    ) -> Result<Arc<dyn CandidateRule>, regex::Error> {
        Ok(Arc::new(self.rule()?))
    }
}

#[derive(Clone, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where the configuration came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
