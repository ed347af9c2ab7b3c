//! Validated port for the metrics endpoint.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Port used when none is configured.
pub const DEFAULT_METRICS_PORT: u16 = 8000;

/// Lowest port the exporter may bind; anything below needs privileges.
pub const MIN_METRICS_PORT: i64 = 1024;

/// Errors raised while setting up metrics exposition.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid metrics port '{value}': {reason}")]
    InvalidPort { value: String, reason: &'static str },

    #[error("failed to bind metrics endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to start metrics runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),
}

/// A port number the metrics exporter is allowed to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricsPort(u16);

impl MetricsPort {
    /// Validate a raw integer port.
    pub fn new(port: i64) -> Result<Self, MetricsError> {
        let invalid = |reason| MetricsError::InvalidPort {
            value: port.to_string(),
            reason,
        };
        if port < 0 || port > i64::from(u16::MAX) {
            return Err(invalid("out of range"));
        }
        if port < MIN_METRICS_PORT {
            return Err(invalid("privileged port"));
        }
        Ok(Self(port as u16))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Address the exporter listens on: every interface, this port.
    pub fn socket_addr(self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.0))
    }
}

impl Default for MetricsPort {
    fn default() -> Self {
        Self(DEFAULT_METRICS_PORT)
    }
}

impl FromStr for MetricsPort {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = s.trim().parse::<i64>().map_err(|_| MetricsError::InvalidPort {
            value: s.to_string(),
            reason: "not an integer",
        })?;
        Self::new(port)
    }
}

impl fmt::Display for MetricsPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
