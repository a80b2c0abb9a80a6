//! Server configuration.
//!
//! Built once at start-up and shared read-only (`Arc<ServerConfig>`) by the
//! acceptor, every session worker and the event multiplexer.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Palette};

/// Process-wide server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub host: IpAddr,
    /// Port the listener binds to. `0` picks an ephemeral port.
    pub port: u16,
    /// Size of each session's receive buffer in bytes.
    pub buffer_size: usize,
    /// Seconds without events before a heartbeat line is logged.
    pub idle_interval_secs: u64,
    /// Branding string sent to every client on connect.
    pub banner: String,
    /// Capacity of each event channel.
    pub event_capacity: usize,
    /// Decorate console output and replies with colours.
    pub color: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 6000,
            buffer_size: 1024,
            idle_interval_secs: 30,
            banner: "JeanServ_2023".to_string(),
            event_capacity: 1,
            color: true,
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Socket address the listener binds to.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Idle heartbeat interval.
    #[must_use]
    pub const fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    /// Decoration matching the `color` setting.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        if self.color {
            Palette::colored()
        } else {
            Palette::plain()
        }
    }

    /// Check the values the server relies on.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be at least 1".into()));
        }
        if self.idle_interval_secs == 0 {
            return Err(ConfigError::Invalid("idle_interval_secs must be at least 1".into()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be at least 1".into()));
        }
        if self.banner.contains('\n') {
            return Err(ConfigError::Invalid("banner must be a single line".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:6000");
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.idle_interval(), Duration::from_secs(30));
        assert_eq!(config.banner, "JeanServ_2023");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"port": 7000, "color": false}"#).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.palette(), Palette::plain());
        assert_eq!(config.buffer_size, 1024);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "jeanserv-config-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"host": "0.0.0.0", "banner": "Hello"}}"#).unwrap();
        drop(file);

        let config = ServerConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:6000");
        assert_eq!(config.banner, "Hello");
    }

    #[test]
    fn test_from_missing_file() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/jeanserv.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = ServerConfig {
            buffer_size: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.buffer_size = 1;
        config.event_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.event_capacity = 1;
        config.idle_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_multiline_banner() {
        let config = ServerConfig {
            banner: "two\nlines".into(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
