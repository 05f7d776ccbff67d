//! Server configuration, read from the environment (and `.env`).

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `ANALYZER_HOST` / `ANALYZER_PORT`, falling back to the defaults when unset
    /// or unparsable.
    pub fn from_env() -> Self {
        Self::from_vars(env::var("ANALYZER_HOST").ok(), env::var("ANALYZER_PORT").ok())
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Self {
        let host = host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = match port {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid ANALYZER_PORT '{}'", raw);
                default_port()
            }),
            None => default_port(),
        };
        Self { host, port }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
