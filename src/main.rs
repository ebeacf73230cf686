use std::sync::{Arc, Mutex};

use chatrelay::config::load_config;
use chatrelay::relay::Relay;
use chatrelay::transport::websocket::start_websocket_server;
use chatrelay::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.server.log_level);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let relay = Arc::new(Mutex::new(Relay::with_retention(
        config.relay.max_messages_per_conversation,
    )));
    start_websocket_server(addr, relay, config).await;
}
