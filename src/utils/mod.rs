//! The `utils` module provides shared definitions used across the `chatrelay`
//! application: the error types surfaced by the relay and the client adapter,
//! and the logging initialization helper.

pub mod error;
pub mod logging;
