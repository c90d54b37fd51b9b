use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

use super::{
    models::{
        AuthConfig, ClientConfig, ConfigMetadata, ServerConfig,
        UsernameCheckConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![PathBuf::from("plaza.toml"), PathBuf::from("config/plaza.toml")]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Skip `.env` discovery entirely (tests, embedded use).
    pub skip_env_file: bool,
    /// Use these overrides instead of reading the process environment.
    pub env: Option<EnvConfig>,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: ClientConfig,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.options.env = Some(env);
        self.options.skip_env_file = true;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;

        let env_config = match &self.options.env {
            Some(env) => env.clone(),
            None => EnvConfig::gather(),
        };

        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let mut warnings = ConfigWarnings::default();
        if config_path.is_none() {
            warnings.push_with_hint(
                "No plaza.toml detected; falling back to environment variables",
                "Create plaza.toml or set PLAZA_CONFIG to point at one",
            );
        }

        let config = compose_config(
            file_config.unwrap_or_default(),
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }

        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };

        loaded.or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(ConfigLoadError::EnvFile(err)),
        })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn compose_config(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<ClientConfig, ConfigLoadError> {
    let defaults = ClientConfig::default();

    let url = match env.server_url.or(file.server.url) {
        Some(raw) => parse_server_url(&raw)?,
        None => defaults.server.url,
    };

    let request_timeout = duration_setting(
        "request_timeout",
        env.request_timeout.or(file.server.request_timeout),
        defaults.server.request_timeout,
    )?;

    let debounce = duration_setting(
        "username.debounce",
        env.username_debounce.or(file.username.debounce),
        defaults.username.debounce,
    )?;

    let username = UsernameCheckConfig {
        debounce,
        pattern: env
            .username_pattern
            .or(file.username.pattern)
            .unwrap_or(defaults.username.pattern),
        format_message: env
            .username_format_message
            .or(file.username.format_message)
            .unwrap_or(defaults.username.format_message),
        fallback_error: env
            .username_fallback_error
            .or(file.username.fallback_error)
            .unwrap_or(defaults.username.fallback_error),
    };

    let auth = AuthConfig {
        token: env.token.or(file.auth.token),
    };

    Ok(ClientConfig {
        server: ServerConfig {
            url,
            request_timeout,
        },
        username,
        auth,
        metadata,
    })
}

/// Accepts `localhost:3000`-style values by assuming http.
fn parse_server_url(raw: &str) -> Result<Url, ConfigLoadError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    Url::parse(&with_scheme).map_err(|source| ConfigLoadError::InvalidUrl {
        value: raw.to_string(),
        source,
    })
}

fn duration_setting(
    key: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(value) => humantime::parse_duration(&value).map_err(|source| {
            ConfigLoadError::InvalidDuration { key, value, source }
        }),
        None => Ok(default),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid server url '{value}'")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid duration for {key}: '{value}'")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_file() {
        let mut file = FileConfig::default();
        file.server.url = Some("http://file.example".into());
        file.username.debounce = Some("500ms".into());

        let env = EnvConfig {
            username_debounce: Some("200ms".into()),
            ..Default::default()
        };

        let config =
            compose_config(file, env, ConfigMetadata::default()).unwrap();
        assert_eq!(config.server.url.as_str(), "http://file.example/");
        assert_eq!(config.username.debounce, Duration::from_millis(200));
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = parse_server_url("localhost:3000/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn bad_duration_names_the_key() {
        let env = EnvConfig {
            username_debounce: Some("soon".into()),
            ..Default::default()
        };
        let err = compose_config(FileConfig::default(), env, ConfigMetadata::default())
            .unwrap_err();
        assert!(err.to_string().contains("username.debounce"));
    }
}
