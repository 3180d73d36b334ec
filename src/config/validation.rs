//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones; returns every error at
//! once instead of stopping at the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ContainerConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("scan.package_scan must not be empty")]
    EmptyNamespace,
    #[error("scan.source_root must not be empty")]
    EmptySourceRoot,
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ContainerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.scan.package_scan.trim().is_empty() {
        errors.push(ValidationError::EmptyNamespace);
    }
    if config.scan.source_root.trim().is_empty() {
        errors.push(ValidationError::EmptySourceRoot);
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
