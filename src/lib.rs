//! # chatrelay
//!
//! `chatrelay` is an in-memory realtime conversation relay built with Rust.
//! Clients connect over WebSockets, join named conversations, receive the
//! conversation's history, exchange ordered chat messages, and see live
//! typing indicators. All state lives for the process lifetime only.
//!
//! ## Core Modules
//!
//! - `relay`: the engine that owns the connection registry and message
//!   store and fans messages out to room members.
//! - `connection`: the server-side handle for one connected client.
//! - `transport`: the JSON event protocol and the WebSocket server.
//! - `client`: the client-side protocol adapter used by frontends and
//!   integration tests.
//! - `query`: read-only bootstrap accessors over the shared store.
//! - `config`: loading and merging server configuration.
//! - `utils`: error types and logging setup.

pub mod client;
pub mod config;
pub mod connection;
pub mod query;
pub mod relay;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
