use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub relay: RelaySettings,
}

/// Configuration settings for the server: bind address and log level.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Operational parameters for the relay engine.
#[derive(Debug, Deserialize, Clone)]
pub struct RelaySettings {
    /// Connections beyond this are refused at accept time.
    pub max_connections: usize,
    /// Per-conversation retention cap; `None` keeps every message for the
    /// process lifetime.
    pub max_messages_per_conversation: Option<usize>,
}

/// Partial configuration loaded from files or environment; missing values
/// fall back to defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub relay: Option<PartialRelaySettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRelaySettings {
    pub max_connections: Option<usize>,
    pub max_messages_per_conversation: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3001,
                log_level: "info".to_string(),
            },
            relay: RelaySettings {
                max_connections: 1000,
                max_messages_per_conversation: None,
            },
        }
    }
}
