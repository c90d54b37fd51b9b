use std::io::Write;
use std::time::Duration;

use plaza_config::{ConfigLoadError, ConfigLoader, EnvConfig};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_file_values() {
    let file = write_config(
        r#"
        [server]
        url = "https://plaza.example"
        request_timeout = "5s"

        [username]
        debounce = "500ms"
        pattern = "^[a-z]{3,12}$"
        format_message = "lowercase letters only"

        [auth]
        token = "secret"
        "#,
    );

    let load = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(file.path())
        .load()
        .expect("config loads");

    let config = load.config;
    assert_eq!(config.server.url.as_str(), "https://plaza.example/");
    assert_eq!(config.server.request_timeout, Duration::from_secs(5));
    assert_eq!(config.username.debounce, Duration::from_millis(500));
    assert_eq!(config.username.format_message, "lowercase letters only");
    assert_eq!(config.auth.token.as_deref(), Some("secret"));
    assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
    assert!(load.warnings.is_empty());

    let rule = config.username.rule().expect("pattern compiles");
    use plaza_core::CandidateRule;
    assert!(rule.check("alice").is_ok());
    assert_eq!(
        rule.check("Alice").unwrap_err().message(),
        "lowercase letters only"
    );
}

#[test]
fn env_beats_file() {
    let file = write_config(
        r#"
        [username]
        debounce = "500ms"
        "#,
    );

    let env = EnvConfig {
        username_debounce: Some("120ms".into()),
        server_url: Some("localhost:4000".into()),
        token: Some("from-env".into()),
        ..Default::default()
    };

    let config = ConfigLoader::new()
        .with_env(env)
        .with_config_path(file.path())
        .load()
        .expect("config loads")
        .config;

    assert_eq!(config.username.debounce, Duration::from_millis(120));
    assert_eq!(config.server.url.as_str(), "http://localhost:4000/");
    assert_eq!(config.auth.token.as_deref(), Some("from-env"));
}

#[test]
fn defaults_without_file_warn() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let err = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(&missing)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = write_config("[server\nurl = 3");
    let err = ConfigLoader::new()
        .with_env(EnvConfig::default())
        .with_config_path(file.path())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn broken_pattern_is_rejected_at_load() {
    let file = write_config(
        r#"
        [username]
        pattern = "(["
        "#,
    );
    let err = ConfigLoader::new()
        .with_env(EnvConfig {
            token: Some("t".into()),
            ..Default::default()
        })
        .with_config_path(file.path())
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::GuardRail(_)));
}
