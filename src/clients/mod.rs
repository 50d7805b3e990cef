//! Client side of the greeting: fetching a message from the proxy and typing it out.

pub mod message_client;
pub mod typewriter;

pub use message_client::*;
pub use typewriter::*;
