//! Startup failures for the foglio binary.

use std::{io, net::SocketAddr};

use thiserror::Error;

/// Everything that can go wrong while bringing the service up. Request-time
/// failures travel as `RepoError` or `HttpError` instead; once the listener
/// is accepting traffic none of these occur.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("telemetry setup failed: {0}")]
    Telemetry(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn bind(addr: SocketAddr, source: io::Error) -> Self {
        Self::Bind { addr, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_failures_name_the_address() {
        let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
        let err = InfraError::bind(addr, io::Error::from(io::ErrorKind::AddrInUse));
        assert!(err.to_string().contains("127.0.0.1:3000"));
    }

    #[test]
    fn configuration_errors_carry_the_reason() {
        let err = InfraError::configuration("admin token is not configured");
        assert_eq!(
            err.to_string(),
            "configuration error: admin token is not configured"
        );
    }
}
