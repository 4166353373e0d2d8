use serde::Deserialize;

use crate::models::MetadataData;

/// One reply envelope from the workflow engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentReply {
  pub success: bool,
  #[serde(default)]
  pub data: Option<MetadataData>,
  #[serde(default)]
  pub error: Option<String>,
}

/// The webhook responds with either a bare reply object or an array of them;
/// normalization takes the first element.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgentPayload {
  Many(Vec<AgentReply>),
  One(AgentReply),
}

impl AgentPayload {
  pub fn into_first(self) -> Option<AgentReply> {
    match self {
      AgentPayload::One(reply) => Some(reply),
      AgentPayload::Many(replies) => replies.into_iter().next(),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
  #[error("Server error {status}: {status_text}")]
  Server { status: u16, status_text: String },
  #[error("Could not reach the workflow agent. Is the backend running and the workflow active?")]
  Unreachable,
  #[error("Request timed out. Please try again.")]
  Timeout,
  #[error("No response received from the agent.")]
  EmptyPayload,
  #[error("{0}")]
  Workflow(String),
  #[error("Invalid response from the agent: {0}")]
  InvalidResponse(String),
  #[error("{0}")]
  Other(String),
}
