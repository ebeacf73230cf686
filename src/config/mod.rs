mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{RelaySettings, ServerSettings, Settings};

/// Loads configuration from `config/default.toml` (optional) and
/// environment variables, merged over the built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Deserialize what is available, then fill the gaps from defaults.
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            log_level: partial
                .server
                .as_ref()
                .and_then(|s| s.log_level.clone())
                .unwrap_or(default.server.log_level),
        },
        relay: RelaySettings {
            max_connections: partial
                .relay
                .as_ref()
                .and_then(|r| r.max_connections)
                .unwrap_or(default.relay.max_connections),
            max_messages_per_conversation: partial
                .relay
                .as_ref()
                .and_then(|r| r.max_messages_per_conversation)
                .or(default.relay.max_messages_per_conversation),
        },
    })
}

#[cfg(test)]
mod tests;
