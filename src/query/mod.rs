//! The `query` module is the read-only facade over the shared message
//! store, used for page-load bootstrapping before a live connection exists:
//! the conversation list for a user and the message list for a
//! conversation. An HTTP layer in front of the relay calls these; the
//! facade itself is transport-agnostic.

pub mod facade;
pub use facade::{ConversationSummary, QueryFacade};
