use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::agent::types::{AgentError, AgentPayload};
use crate::models::MetadataData;

/// Upper bound on the whole request; past it the attempt counts as failed.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const WEBHOOK_PATH: &str = "/webhook/seo-metadata-agent";

pub struct AgentClient {
  http: Client,
  base_url: String,
}

impl AgentClient {
  pub fn new(base_url: String) -> Self {
    let http = Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .expect("Failed to build HTTP client");
    Self { http, base_url }
  }

  /// Issues the single outbound analysis call. One attempt per submit, no
  /// retries: the workflow is slow and not known to be idempotent, so failure
  /// is surfaced immediately instead.
  pub async fn analyze(&self, url: &str, keyword: &str) -> Result<MetadataData, AgentError> {
    let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), WEBHOOK_PATH);

    let response = self
      .http
      .post(&endpoint)
      .json(&json!({ "url": url, "keyword": keyword }))
      .send()
      .await
      .map_err(classify_transport_error)?;

    let status = response.status();
    if !status.is_success() {
      return Err(AgentError::Server {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
      });
    }

    let payload: AgentPayload = response
      .json()
      .await
      .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

    interpret_payload(payload)
  }
}

/// First match wins: timeout, then connectivity, then the underlying message.
/// Non-2xx statuses never reach this; they are classified off the response.
fn classify_transport_error(e: reqwest::Error) -> AgentError {
  if e.is_timeout() {
    AgentError::Timeout
  } else if e.is_connect() {
    AgentError::Unreachable
  } else {
    AgentError::Other(e.to_string())
  }
}

pub(crate) fn interpret_payload(payload: AgentPayload) -> Result<MetadataData, AgentError> {
  let reply = payload.into_first().ok_or(AgentError::EmptyPayload)?;
  if !reply.success {
    return Err(AgentError::Workflow(
      reply
        .error
        .unwrap_or_else(|| "The agent returned an error.".to_string()),
    ));
  }
  reply
    .data
    .ok_or_else(|| AgentError::InvalidResponse("success reply carried no data".to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(json: &str) -> AgentPayload {
    serde_json::from_str(json).unwrap()
  }

  const OK_REPLY: &str = r#"{
    "success": true,
    "data": {
      "url": "https://x.com",
      "keyword": "ab",
      "current": { "title": "t", "description": "d" },
      "optimizedVariations": []
    }
  }"#;

  #[test]
  fn bare_object_reply_is_accepted() {
    let data = interpret_payload(payload(OK_REPLY)).unwrap();
    assert_eq!(data.url, "https://x.com");
    assert_eq!(data.keyword, "ab");
  }

  #[test]
  fn one_element_array_reply_is_accepted() {
    let wrapped = format!("[{OK_REPLY}]");
    let data = interpret_payload(payload(&wrapped)).unwrap();
    assert_eq!(data.url, "https://x.com");
  }

  #[test]
  fn only_the_first_array_element_counts() {
    let wrapped = format!("[{OK_REPLY}, {{\"success\": false, \"error\": \"ignored\"}}]");
    assert!(interpret_payload(payload(&wrapped)).is_ok());
  }

  #[test]
  fn empty_array_maps_to_the_fixed_no_response_message() {
    let err = interpret_payload(payload("[]")).unwrap_err();
    assert_eq!(err.to_string(), "No response received from the agent.");
  }

  #[test]
  fn reported_failure_surfaces_the_agent_message() {
    let err = interpret_payload(payload(r#"{ "success": false, "error": "Scrape blocked" }"#)).unwrap_err();
    assert_eq!(err.to_string(), "Scrape blocked");
  }

  #[test]
  fn reported_failure_without_message_uses_fallback() {
    let err = interpret_payload(payload(r#"{ "success": false }"#)).unwrap_err();
    assert_eq!(err.to_string(), "The agent returned an error.");
  }

  #[test]
  fn success_without_data_is_invalid() {
    let err = interpret_payload(payload(r#"{ "success": true }"#)).unwrap_err();
    assert!(matches!(err, AgentError::InvalidResponse(_)));
  }

  #[test]
  fn error_messages_match_the_ui_contract() {
    let server = AgentError::Server { status: 502, status_text: "Bad Gateway".into() };
    assert_eq!(server.to_string(), "Server error 502: Bad Gateway");
    assert_eq!(AgentError::Timeout.to_string(), "Request timed out. Please try again.");
    assert_eq!(
      AgentError::Unreachable.to_string(),
      "Could not reach the workflow agent. Is the backend running and the workflow active?"
    );
  }
}
