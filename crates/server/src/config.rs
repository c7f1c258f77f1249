use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Environment prefix for server settings, e.g. `ADFORECAST_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "ADFORECAST_SERVER";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Serve Prometheus text on `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// JSON file replacing the built-in fallback table
    #[serde(default)]
    pub fallback_table_path: Option<PathBuf>,

    /// Timeout for a single keyword provider call in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            fallback_table_path: None,
            provider_timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` file and
    /// `ADFORECAST_SERVER__*` environment variables, in that order.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings where the provider call could outlive the request.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider_timeout_secs == 0 {
            anyhow::bail!("provider_timeout_secs must be greater than 0");
        }
        if self.provider_timeout_secs >= self.timeout_secs {
            anyhow::bail!(
                "provider_timeout_secs ({}) must be less than timeout_secs ({})",
                self.provider_timeout_secs,
                self.timeout_secs
            );
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Budget for one keyword provider call, token grant included
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 1024 * 1024);
        assert_eq!(cfg.provider_timeout_secs, 20);
        assert!(cfg.fallback_table_path.is_none());
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn provider_timeout_must_fit_inside_request_timeout() {
        let cfg = ServerConfig {
            timeout_secs: 10,
            provider_timeout_secs: 10,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("provider_timeout_secs"));

        let cfg = ServerConfig {
            timeout_secs: 10,
            provider_timeout_secs: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ServerConfig {
            timeout_secs: 10,
            provider_timeout_secs: 9,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.provider_timeout(), Duration::from_secs(9));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn partial_source_fills_defaults() {
        let cfg: ServerConfig = config::Config::builder()
            .set_override("port", 9100)
            .unwrap()
            .set_override("fallback_table_path", "/etc/adforecast/table.json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(
            cfg.fallback_table_path,
            Some(PathBuf::from("/etc/adforecast/table.json"))
        );
        assert_eq!(cfg.log_level, "info");
    }
}
