//! The `transport` module handles network communication with clients over
//! WebSockets: it defines the JSON event protocol and implements the server
//! accept loop, per-connection send/receive tasks, and dispatch of decoded
//! events into the relay engine.

pub mod message;
pub mod websocket;
