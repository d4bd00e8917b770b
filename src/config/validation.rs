//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: a pure function over the
//! config that reports all failures together, not just the first. Runs before
//! a config is accepted into the system.

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("listen address {0:?} is not a valid socket address")]
    InvalidAddr(String),

    #[error("tls is enabled but cert_path is empty")]
    MissingTlsCert,

    #[error("tls is enabled but key_path is empty")]
    MissingTlsKey,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddr(config.addr.clone()));
    }

    if config.tls.enabled {
        if config.tls.cert_path.is_empty() {
            errors.push(ValidationError::MissingTlsCert);
        }
        if config.tls.key_path.is_empty() {
            errors.push(ValidationError::MissingTlsKey);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
