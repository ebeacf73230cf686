//! The `client` module is the client-side protocol adapter: a typed wrapper
//! over a WebSocket connection that joins a conversation on connect and
//! exposes send/typing/receive operations, mirroring what a frontend chat
//! hook does against the relay.

pub mod chat_client;
pub use chat_client::ChatClient;
