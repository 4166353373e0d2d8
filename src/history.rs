use crate::models::{HistoryEntry, MetadataData, ID};

pub const MAX_ENTRIES: usize = 50;

/// In-memory attempt log, newest first, capped at [`MAX_ENTRIES`]. Callers
/// write it back to the store after every mutation; the log itself never
/// touches persistence, so it stays correct even when a write-back fails.
#[derive(Debug, Default)]
pub struct HistoryLog {
  entries: Vec<HistoryEntry>,
}

impl HistoryLog {
  pub fn new(entries: Vec<HistoryEntry>) -> Self {
    let mut log = HistoryLog { entries };
    log.entries.truncate(MAX_ENTRIES);
    log
  }

  pub fn entries(&self) -> &[HistoryEntry] {
    &self.entries
  }

  pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
    self.entries.iter().find(|e| e.id == id)
  }

  pub fn record_success(&mut self, url: String, keyword: String, result: MetadataData) {
    self.push(HistoryEntry::success(url, keyword, result));
  }

  pub fn record_success_with_id(&mut self, id: ID, url: String, keyword: String, result: MetadataData) {
    self.push(HistoryEntry::success_with_id(id, url, keyword, result));
  }

  pub fn record_failure(&mut self, url: String, keyword: String, error: String) {
    self.push(HistoryEntry::failure(url, keyword, error));
  }

  /// Removes the first entry matching `id`; silent no-op when absent.
  pub fn remove(&mut self, id: &str) {
    if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
      self.entries.remove(pos);
    }
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn push(&mut self, entry: HistoryEntry) {
    self.entries.insert(0, entry);
    self.entries.truncate(MAX_ENTRIES);
  }
}
