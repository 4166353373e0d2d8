use tauri::{AppHandle, State};

use crate::db;
use crate::history::HistoryLog;
use crate::models::HistoryEntry;
use crate::session::SessionSnapshot;
use crate::validate::{self, ValidationReport};
use crate::AppState;

#[tauri::command]
pub fn db_health(app: AppHandle) -> Result<serde_json::Value, String> {
  let p = db::db_path(&app).map_err(|e| e.to_string())?;
  Ok(serde_json::json!({ "ok": true, "path": p.to_string_lossy() }))
}

/// Runs one analysis attempt end to end: transition to Loading, one webhook
/// call, transition to Succeeded/Failed, record the matching history entry.
#[tauri::command]
pub async fn analyze_page(
  app: AppHandle,
  state: State<'_, AppState>,
  url: String,
  keyword: String,
) -> Result<SessionSnapshot, String> {
  let report = validate::check(&url, &keyword);
  if !report.can_submit {
    return Err("URL must start with http:// or https:// and the keyword needs at least 2 characters.".into());
  }

  {
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session.begin(url.clone(), keyword.clone()).map_err(|e| e.to_string())?;
  }
  log::info!("analyzing {url} for keyword {keyword:?}");

  // The lock is not held across the await; UI reads stay possible while the
  // webhook call is in flight.
  let outcome = state.agent.analyze(&url, &keyword).await;

  let mut session = state.session.lock().map_err(|e| e.to_string())?;
  let mut history = state.history.lock().map_err(|e| e.to_string())?;
  match outcome {
    Ok(data) => {
      history.record_success(url, keyword, data.clone());
      session.complete_success(data);
    }
    Err(err) => {
      let message = err.to_string();
      log::warn!("analysis failed: {message}");
      history.record_failure(url, keyword, message.clone());
      session.complete_failure(message);
    }
  }
  persist_history(&app, &history);

  Ok(session.snapshot())
}

#[tauri::command]
pub fn get_session(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
  let session = state.session.lock().map_err(|e| e.to_string())?;
  Ok(session.snapshot())
}

#[tauri::command]
pub fn dismiss_error(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
  let mut session = state.session.lock().map_err(|e| e.to_string())?;
  session.dismiss_error();
  Ok(session.snapshot())
}

/// Repopulates the form and reproduces a past attempt's outcome. No network
/// call is made.
#[tauri::command]
pub fn restore_history_entry(state: State<'_, AppState>, id: String) -> Result<SessionSnapshot, String> {
  let entry: HistoryEntry = {
    let history = state.history.lock().map_err(|e| e.to_string())?;
    history
      .get(&id)
      .cloned()
      .ok_or_else(|| format!("No history entry with id {id}"))?
  };

  let mut session = state.session.lock().map_err(|e| e.to_string())?;
  session.restore(&entry).map_err(|e| e.to_string())?;
  Ok(session.snapshot())
}

#[tauri::command]
pub fn list_history(state: State<'_, AppState>) -> Result<Vec<HistoryEntry>, String> {
  let history = state.history.lock().map_err(|e| e.to_string())?;
  Ok(history.entries().to_vec())
}

#[tauri::command]
pub fn delete_history_entry(
  app: AppHandle,
  state: State<'_, AppState>,
  id: String,
) -> Result<Vec<HistoryEntry>, String> {
  let mut history = state.history.lock().map_err(|e| e.to_string())?;
  history.remove(&id);
  persist_history(&app, &history);
  Ok(history.entries().to_vec())
}

#[tauri::command]
pub fn clear_history(app: AppHandle, state: State<'_, AppState>) -> Result<Vec<HistoryEntry>, String> {
  let mut history = state.history.lock().map_err(|e| e.to_string())?;
  history.clear();
  persist_history(&app, &history);
  Ok(history.entries().to_vec())
}

#[tauri::command]
pub fn validate_inputs(url: String, keyword: String) -> ValidationReport {
  validate::check(&url, &keyword)
}

#[tauri::command]
pub fn get_setting(app: AppHandle, key: String) -> Result<Option<String>, String> {
  let conn = db::connect(&app).map_err(|e| e.to_string())?;
  db::get_setting(&conn, &key).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_setting(app: AppHandle, key: String, value: String) -> Result<(), String> {
  let conn = db::connect(&app).map_err(|e| e.to_string())?;
  db::set_setting(&conn, &key, &value).map_err(|e| e.to_string())
}

/// Write-back after every history mutation. Failures are logged and dropped:
/// the in-memory log stays correct for the session even when the store is
/// full or unavailable.
fn persist_history(app: &AppHandle, history: &HistoryLog) {
  let written = db::connect(app).and_then(|conn| db::save_history(&conn, history.entries()));
  if let Err(e) = written {
    log::warn!("history write-back failed: {e}");
  }
}
