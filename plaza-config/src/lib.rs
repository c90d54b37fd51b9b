//! Configuration for Plaza profile clients.
//!
//! Values are composed from (highest priority first) process environment,
//! an optional `.env` file, a `plaza.toml` file, and built-in defaults.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AuthConfig, ClientConfig, ConfigMetadata, ServerConfig, UsernameCheckConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
