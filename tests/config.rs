//! Configuration defaults, parsing, and validation.

use graceful_server::config::{load_config, validate_config, ConfigError, ServerConfig};

#[test]
fn defaults_match_documented_values() {
    let config = ServerConfig::default();
    assert_eq!(config.addr, "0.0.0.0:8080");
    assert_eq!(config.shutdown_timeout_secs, 20);
    assert_eq!(config.graceful_timeout_secs, 21);
    assert_eq!(config.health_path, "/_health");
    assert_eq!(config.api_version, "v1");
    assert_eq!(config.request_timeout_secs, 20);
    assert_eq!(config.rate_limit, 1000);
    assert!(!config.tls.enabled);
    assert!(config.tls.cert_path.is_empty());
    assert!(config.tls.key_path.is_empty());
}

#[test]
fn empty_toml_yields_defaults() {
    let config: ServerConfig = toml::from_str("").expect("empty config must parse");
    assert_eq!(config.addr, ServerConfig::default().addr);
    assert_eq!(config.shutdown_timeout_secs, 20);
}

#[test]
fn partial_toml_overrides_defaults() {
    let config: ServerConfig = toml::from_str(
        r#"
        addr = "127.0.0.1:9999"
        shutdown_timeout_secs = 5

        [tls]
        enabled = true
        cert_path = "/etc/certs/server.pem"
        key_path = "/etc/certs/server.key"
        "#,
    )
    .expect("partial config must parse");

    assert_eq!(config.addr, "127.0.0.1:9999");
    assert_eq!(config.shutdown_timeout_secs, 5);
    assert_eq!(config.graceful_timeout_secs, 21);
    assert!(config.tls.enabled);
    assert_eq!(config.tls.cert_path, "/etc/certs/server.pem");
}

#[test]
fn tls_enabled_requires_cert_and_key() {
    let config = ServerConfig {
        tls: graceful_server::TlsConfig {
            enabled: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let errors = validate_config(&config).expect_err("missing TLS material must fail");
    assert_eq!(errors.len(), 2);
}

#[test]
fn host_port_address_is_required() {
    // Bare ":8080" style addresses are not socket addresses.
    let config = ServerConfig {
        addr: ":8080".into(),
        ..Default::default()
    };

    let errors = validate_config(&config).expect_err("bare port must fail validation");
    assert_eq!(errors.len(), 1);
}

#[test]
fn load_config_reads_and_validates() {
    let path = std::env::temp_dir().join("graceful-server-config-test.toml");
    std::fs::write(&path, "addr = \"127.0.0.1:8123\"\n").unwrap();

    let config = load_config(&path).expect("valid file must load");
    assert_eq!(config.addr, "127.0.0.1:8123");

    std::fs::write(&path, "addr = \"not-an-address\"\n").unwrap();
    let err = load_config(&path).expect_err("invalid address must fail validation");
    assert!(matches!(err, ConfigError::Validation(_)));

    let _ = std::fs::remove_file(&path);
}
