use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

/// Server settings read from the environment (after `.env` is loaded).
///
/// | Env var    | Default                 |
/// |------------|-------------------------|
/// | `HOST`     | `127.0.0.1`             |
/// | `PORT`     | `8080`                  |
/// | `RUST_LOG` | `info,tower_http=debug` |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let host = host.parse::<IpAddr>().with_context(|| format!("HOST is not an IP address: {host}"))?;
        let port = lookup("PORT").unwrap_or_else(|| "8080".into());
        let port = port.parse::<u16>().with_context(|| format!("PORT is not a valid port: {port}"))?;
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info,tower_http=debug".into());
        Ok(Self { host, port, log_filter })
    }

    pub fn addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}
