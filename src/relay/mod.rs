//! The `relay` module is the core of the messaging system: the connection
//! registry, the in-memory message store with its conversation index, and the
//! engine that drives both in response to protocol events and fans messages
//! out to room members.

pub mod engine;
pub mod message;
pub mod registry;
pub mod store;

pub use engine::Relay;
