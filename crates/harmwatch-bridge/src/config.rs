//! Bridge configuration

use crate::cli::ServeArgs;
use crate::hub::HubOptions;
use harmwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one send to one subscriber
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Payloads buffered per subscriber
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,

    /// Accept cross-origin requests from any origin
    #[serde(default)]
    pub cors_allow_any: bool,
}

impl BridgeConfig {
    /// Load configuration from file and CLI overrides.
    ///
    /// A missing file yields defaults; an unreadable or invalid one is an error.
    pub fn load(config_path: impl AsRef<Path>, args: &ServeArgs) -> Result<Self> {
        let path = config_path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    pub fn apply_overrides(&mut self, args: &ServeArgs) {
        if let Some(listen) = &args.listen {
            self.listen = listen.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(ms) = args.send_timeout_ms {
            self.send_timeout_ms = ms;
        }
        if let Some(buffer) = args.subscriber_buffer {
            self.subscriber_buffer = buffer;
        }
        if let Some(allow) = args.cors_allow_any {
            self.cors_allow_any = allow;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.send_timeout_ms == 0 {
            return Err(Error::config("send_timeout_ms must be greater than zero"));
        }
        if self.subscriber_buffer == 0 {
            return Err(Error::config("subscriber_buffer must be greater than zero"));
        }
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.listen, self.port)
            .parse()
            .map_err(|e| Error::config(format!("invalid listen address '{}': {}", self.listen, e)))
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn hub_options(&self) -> HubOptions {
        HubOptions {
            send_timeout: self.send_timeout(),
            subscriber_buffer: self.subscriber_buffer,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            send_timeout_ms: default_send_timeout_ms(),
            subscriber_buffer: default_subscriber_buffer(),
            cors_allow_any: false,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_send_timeout_ms() -> u64 {
    2000
}

fn default_subscriber_buffer() -> usize {
    64
}
