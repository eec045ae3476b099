//! Service configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SERVICE_HOST` | `0.0.0.0` | Bind address |
//! | `SERVICE_PORT` | `8080` | Bind port |
//! | `SECTOR_ID` | `1` | Navigation sector identifier |
//! | `MAX_BODY_BYTES` | `65536` | Largest accepted request body |
//! | `SHUTDOWN_TIMEOUT_SECS` | `5` | Grace period for in-flight requests |
//! | `SHUTDOWN_ON_HANDLER_ERROR` | `false` | Stop the process after a handler error |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use dns_lib::DEFAULT_SECTOR_ID;

use crate::app::ShutdownPolicy;

/// Configuration could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for an HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub sector_id: f64,
    pub max_body_bytes: usize,
    pub shutdown_timeout: Duration,
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            sector_id: DEFAULT_SECTOR_ID,
            max_body_bytes: 64 * 1024,
            shutdown_timeout: Duration::from_secs(5),
            shutdown_policy: ShutdownPolicy::LogOnly,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sector_id: f64 = parse_var(&lookup, "SECTOR_ID")?.unwrap_or(defaults.sector_id);
        if !sector_id.is_finite() {
            return Err(ConfigError::Invalid {
                var: "SECTOR_ID",
                value: sector_id.to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let shutdown_policy = match parse_bool(&lookup, "SHUTDOWN_ON_HANDLER_ERROR")? {
            Some(true) => ShutdownPolicy::Shutdown,
            Some(false) | None => ShutdownPolicy::LogOnly,
        };

        Ok(Self {
            host: parse_var(&lookup, "SERVICE_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "SERVICE_PORT")?.unwrap_or(defaults.port),
            sector_id,
            max_body_bytes: parse_var(&lookup, "MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
            shutdown_timeout: parse_var(&lookup, "SHUTDOWN_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_timeout),
            shutdown_policy,
        })
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn parse_bool<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                value,
                reason: "expected true or false".to_string(),
            }),
        })
        .transpose()
}
