use thiserror::Error;

use super::models::ClientConfig;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("server url must use http or https, got '{scheme}'")]
    UnsupportedScheme { scheme: String },
    #[error("username pattern does not compile")]
    InvalidUsernamePattern {
        #[source]
        source: regex::Error,
    },
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &ClientConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let scheme = config.server.url.scheme();
    if !matches!(scheme, "http" | "https") {
        return Err(ConfigGuardRailError::UnsupportedScheme {
            scheme: scheme.to_string(),
        });
    }

    if config.server.request_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroRequestTimeout);
    }

    if let Err(source) = config.username.rule() {
        return Err(ConfigGuardRailError::InvalidUsernamePattern { source });
    }

    if config.username.debounce.is_zero() {
        warnings.push_with_hint(
            "username debounce is zero; every keystroke will hit the server",
            "Set PLAZA_USERNAME_DEBOUNCE (e.g. 350ms) to coalesce typing bursts",
        );
    }

    if scheme == "http" && !is_loopback(config) {
        warnings.push_with_hint(
            "server url uses plain http for a non-local host",
            "Use https:// so bearer tokens are not sent in clear text",
        );
    }

    if config.auth.token.is_none() {
        warnings.push(
            "no bearer token configured; only public endpoints will succeed",
        );
    }

    Ok(warnings)
}

fn is_loopback(config: &ClientConfig) -> bool {
    matches!(
        config.server.url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    )
}
