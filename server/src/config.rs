//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_ROOM_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_CLIENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub auth_secret: String,
    pub room_history_limit: usize,
    pub client_channel_capacity: usize,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `AUTH_SECRET`: key shared with whoever issues session tokens
    ///
    /// Optional:
    /// - `PORT`: default 8080
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `ROOM_HISTORY_LIMIT`: shapes kept per room, default 50
    /// - `CLIENT_CHANNEL_CAPACITY`: outbound queue depth per connection, default 256
    ///
    /// # Errors
    ///
    /// Returns an error if `AUTH_SECRET` is missing or a numeric var does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_secret = lookup("AUTH_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SECRET"))?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let room_history_limit = parse_or("ROOM_HISTORY_LIMIT", lookup("ROOM_HISTORY_LIMIT"), DEFAULT_ROOM_HISTORY_LIMIT)?;
        let client_channel_capacity = parse_or(
            "CLIENT_CHANNEL_CAPACITY",
            lookup("CLIENT_CHANNEL_CAPACITY"),
            DEFAULT_CLIENT_CHANNEL_CAPACITY,
        )?;
        if client_channel_capacity == 0 {
            return Err(ConfigError::Invalid { var: "CLIENT_CHANNEL_CAPACITY", value: "0".into() });
        }

        Ok(Self { bind_addr, port, auth_secret, room_history_limit, client_channel_capacity })
    }

    /// `host:port` string for the listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}
