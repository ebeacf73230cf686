//! The `connection` module defines the server-side handle for one connected
//! client: its connection id and the channel the engine uses to push
//! outbound WebSocket frames to it.

pub mod handle;
pub use handle::ConnectionHandle;
