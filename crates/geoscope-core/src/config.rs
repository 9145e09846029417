//! Resolution of the analysis service's base URL.
//!
//! Resolution order:
//!
//! 1. An explicit override (`GEOSCOPE_API_URL` or `--api-url`) is used as is.
//! 2. Otherwise the base URL is inferred from the dashboard origin:
//!    - loopback host → the relative `/api` path on that origin;
//!    - numeric IP host → the same host on [`FALLBACK_PORT`], under `/api`;
//!    - anything else → demo mode, where the backend is unavailable.
//!
//! ```rust
//! use geoscope_core::config::{ApiConfig, ConnectionMode};
//!
//! let config = ApiConfig::resolve(None, "http://localhost:8000").unwrap();
//! assert_eq!(config.mode, ConnectionMode::Local);
//! assert_eq!(config.base_url.unwrap().as_str(), "http://localhost:8000/api");
//!
//! let config = ApiConfig::resolve(None, "https://geo.example.com").unwrap();
//! assert_eq!(config.mode, ConnectionMode::Demo);
//! assert!(!config.is_backend_available());
//! ```

use std::{fmt, net::IpAddr};

use log::debug;
use url::{Host, Url};

use crate::error::{GeoscopeError, Result, ResultExt};

/// Environment variable holding an explicit API base URL.
pub const API_URL_ENV: &str = "GEOSCOPE_API_URL";

/// Origin assumed when none is given.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Port the backend listens on when co-hosted with the dashboard.
pub const FALLBACK_PORT: u16 = 8000;

/// Path prefix of the API on the backend.
pub const API_PATH: &str = "/api";

/// How the client reaches the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Backend on the local machine
    Local,
    /// Backend reached over the network (override or co-hosted IP)
    Remote,
    /// No backend; remote operations are refused
    Demo,
}

impl ConnectionMode {
    /// Message describing the mode to the user.
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionMode::Local => "Running on localhost",
            ConnectionMode::Remote => "Connected to remote backend",
            ConnectionMode::Demo => "Demo mode - backend not available",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionMode::Local => "local",
            ConnectionMode::Remote => "remote",
            ConnectionMode::Demo => "demo",
        };
        f.write_str(name)
    }
}

/// Resolved connection settings for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub mode: ConnectionMode,
    /// API root, e.g. `http://localhost:8000/api`; `None` in demo mode
    pub base_url: Option<Url>,
}

impl ApiConfig {
    /// Resolves the configuration from an optional override and an origin.
    ///
    /// # Errors
    ///
    /// Returns `GeoscopeError::Configuration` if the override or the origin
    /// is not a valid URL.
    pub fn resolve(api_override: Option<&str>, origin: &str) -> Result<Self> {
        if let Some(raw) = api_override.map(str::trim).filter(|raw| !raw.is_empty()) {
            let base_url = Url::parse(raw).with_context(format!("Invalid API URL '{raw}'"))?;
            debug!("Using explicit API URL {base_url}");
            return Ok(Self {
                mode: ConnectionMode::Remote,
                base_url: Some(base_url),
            });
        }

        let origin = Url::parse(origin).with_context(format!("Invalid origin '{origin}'"))?;
        let config = match origin.host() {
            Some(host) if is_loopback(&host) => Self {
                mode: ConnectionMode::Local,
                base_url: Some(join_api_path(&origin)?),
            },
            Some(Host::Ipv4(_) | Host::Ipv6(_)) => {
                let mut base = origin.clone();
                base.set_port(Some(FALLBACK_PORT)).map_err(|()| GeoscopeError::Configuration {
                    message: format!("Cannot set port on origin '{origin}'"),
                })?;
                Self {
                    mode: ConnectionMode::Remote,
                    base_url: Some(join_api_path(&base)?),
                }
            }
            _ => Self {
                mode: ConnectionMode::Demo,
                base_url: None,
            },
        };
        debug!("Resolved {} connection mode from origin {origin}", config.mode);
        Ok(config)
    }

    /// Resolves using the `GEOSCOPE_API_URL` environment variable when no
    /// explicit override is given.
    pub fn from_env(api_override: Option<&str>, origin: Option<&str>) -> Result<Self> {
        let env_override = std::env::var(API_URL_ENV).ok();
        let api_override = api_override.or(env_override.as_deref());
        Self::resolve(api_override, origin.unwrap_or(DEFAULT_ORIGIN))
    }

    /// Configuration that never reaches a backend.
    pub fn demo() -> Self {
        Self {
            mode: ConnectionMode::Demo,
            base_url: None,
        }
    }

    pub fn is_backend_available(&self) -> bool {
        self.base_url.is_some()
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => IpAddr::V4(*ip).is_loopback(),
        Host::Ipv6(ip) => IpAddr::V6(*ip).is_loopback(),
    }
}

fn join_api_path(origin: &Url) -> Result<Url> {
    origin
        .join(API_PATH)
        .with_context(format!("Cannot derive API URL from '{origin}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config =
            ApiConfig::resolve(Some("https://api.geo.example.com/api"), "https://geo.example.com")
                .unwrap();
        assert_eq!(config.mode, ConnectionMode::Remote);
        assert_eq!(
            config.base_url.unwrap().as_str(),
            "https://api.geo.example.com/api"
        );
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = ApiConfig::resolve(Some("  "), "http://127.0.0.1:5173").unwrap();
        assert_eq!(config.mode, ConnectionMode::Local);
        assert_eq!(config.base_url.unwrap().as_str(), "http://127.0.0.1:5173/api");
    }

    #[test]
    fn test_numeric_ip_uses_fallback_port() {
        let config = ApiConfig::resolve(None, "http://3.12.198.127").unwrap();
        assert_eq!(config.mode, ConnectionMode::Remote);
        assert_eq!(config.base_url.unwrap().as_str(), "http://3.12.198.127:8000/api");
    }

    #[test]
    fn test_ipv6_loopback_is_local() {
        let config = ApiConfig::resolve(None, "http://[::1]:3000").unwrap();
        assert_eq!(config.mode, ConnectionMode::Local);
    }

    #[test]
    fn test_domain_host_is_demo() {
        let config = ApiConfig::resolve(None, "https://dashboard.example.org").unwrap();
        assert_eq!(config, ApiConfig::demo());
        assert_eq!(config.mode.message(), "Demo mode - backend not available");
    }

    #[test]
    fn test_invalid_urls_are_configuration_errors() {
        let err = ApiConfig::resolve(Some("not a url"), DEFAULT_ORIGIN).unwrap_err();
        assert!(matches!(err, GeoscopeError::Configuration { .. }));

        let err = ApiConfig::resolve(None, "::::").unwrap_err();
        assert!(matches!(err, GeoscopeError::Configuration { .. }));
    }
}
