pub mod client;
pub mod types;

pub use client::AgentClient;
pub use types::{AgentError, AgentPayload, AgentReply};
