//! Server configuration.

use std::net::SocketAddr;

use reelsmith_types::RunConfig;

/// Environment variable for the bind address.
pub const ENV_BIND: &str = "REELSMITH_BIND";

/// Environment variable for the bearer auth token.
pub const ENV_AUTH_TOKEN: &str = "REELSMITH_AUTH_TOKEN";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Authentication token. `None` means auth is disabled (localhost mode).
    pub auth_token: Option<String>,

    /// Override for the environment-derived run defaults. When unset, the
    /// unattended path reads the process environment per request.
    pub run_defaults: Option<RunConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".parse().unwrap(),
            auth_token: None,
            run_defaults: None,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with an optional auth token.
    /// Pass `None` to disable authentication (localhost mode).
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token,
            ..Default::default()
        }
    }

    /// Read the bind address and auth token from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::new(std::env::var(ENV_AUTH_TOKEN).ok().filter(|t| !t.is_empty()));
        if let Some(addr) = std::env::var(ENV_BIND)
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            config.bind_address = addr;
        }
        config
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Pin the run defaults instead of reading the environment.
    pub fn with_run_defaults(mut self, defaults: RunConfig) -> Self {
        self.run_defaults = Some(defaults);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ServerConfig::new(Some("secret".to_string()))
            .with_bind_address("0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.bind_address.port(), 9000);
        assert!(config.run_defaults.is_none());
    }
}
