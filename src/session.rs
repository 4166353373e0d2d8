use serde::Serialize;
use thiserror::Error;

use crate::models::{HistoryEntry, MetadataData};

/// Shown when a stored failure entry carries no message.
pub const RESTORED_FAILURE_FALLBACK: &str = "This attempt failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Idle,
  Loading,
  Succeeded,
  Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("An analysis is already in progress.")]
  Busy,
}

/// Submission-and-result state machine. At most one request is in flight:
/// `begin` rejects while `Loading`, and every transition out of `Loading`
/// goes through exactly one of the `complete_*` methods.
#[derive(Debug)]
pub struct Session {
  phase: Phase,
  url: String,
  keyword: String,
  result: Option<MetadataData>,
  error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
  pub phase: Phase,
  pub url: String,
  pub keyword: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<MetadataData>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl Default for Session {
  fn default() -> Self {
    Session {
      phase: Phase::Idle,
      url: String::new(),
      keyword: String::new(),
      result: None,
      error: None,
    }
  }
}

impl Session {
  /// `* -> Loading`. Stale result/error are cleared here, at the start of the
  /// cycle, so they are never visible during a new Loading period.
  pub fn begin(&mut self, url: String, keyword: String) -> Result<(), SessionError> {
    if self.phase == Phase::Loading {
      return Err(SessionError::Busy);
    }
    self.url = url;
    self.keyword = keyword;
    self.result = None;
    self.error = None;
    self.phase = Phase::Loading;
    Ok(())
  }

  pub fn complete_success(&mut self, data: MetadataData) {
    self.result = Some(data);
    self.error = None;
    self.phase = Phase::Succeeded;
  }

  pub fn complete_failure(&mut self, message: String) {
    self.result = None;
    self.error = Some(message);
    self.phase = Phase::Failed;
  }

  pub fn dismiss_error(&mut self) {
    self.error = None;
  }

  /// Pure state restoration from a history entry: repopulates the form and
  /// reproduces the stored outcome without a network call.
  pub fn restore(&mut self, entry: &HistoryEntry) -> Result<(), SessionError> {
    if self.phase == Phase::Loading {
      return Err(SessionError::Busy);
    }
    self.url = entry.url.clone();
    self.keyword = entry.keyword.clone();
    match (&entry.result, entry.success) {
      (Some(result), true) => {
        self.result = Some(result.clone());
        self.error = None;
        self.phase = Phase::Succeeded;
      }
      _ => {
        self.result = None;
        self.error = Some(
          entry
            .error
            .clone()
            .unwrap_or_else(|| RESTORED_FAILURE_FALLBACK.to_string()),
        );
        self.phase = Phase::Failed;
      }
    }
    Ok(())
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn snapshot(&self) -> SessionSnapshot {
    SessionSnapshot {
      phase: self.phase,
      url: self.url.clone(),
      keyword: self.keyword.clone(),
      result: self.result.clone(),
      error: self.error.clone(),
    }
  }
}
