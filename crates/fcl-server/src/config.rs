use std::net::{Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Transport settings, the `[server]` table of the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Attach a permissive CORS layer for browser clients.
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8545)),
            permissive_cors: false,
        }
    }
}
