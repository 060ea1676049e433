use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 7766;

// Enough for a day of one-second samples.
pub const DEFAULT_MAX_POINTS: usize = 100_000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    // Largest number of samples a single /series request may generate.
    pub max_points: usize,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("max_points must be greater than zero")]
    MaxPointsError,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_points == 0 {
            return Err(ConfigError::MaxPointsError);
        }
        Ok(())
    }
}
