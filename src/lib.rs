use std::sync::Mutex;

use tauri::Manager;

mod agent;
mod commands;
mod db;
mod history;
mod models;
mod session;
mod validate;

use agent::AgentClient;
use history::HistoryLog;
use session::Session;

pub const SETTING_AGENT_BASE_URL: &str = "agent_base_url";
const ENV_AGENT_BASE_URL: &str = "METASCOPE_AGENT_URL";
const DEFAULT_AGENT_BASE_URL: &str = "http://localhost:5678";

pub struct AppState {
  pub session: Mutex<Session>,
  pub history: Mutex<HistoryLog>,
  pub agent: AgentClient,
}

/// Settings override, then deployment environment, then the workflow engine's
/// default port. Resolved once at startup.
fn resolve_base_url(conn: &rusqlite::Connection) -> String {
  if let Ok(Some(value)) = db::get_setting(conn, SETTING_AGENT_BASE_URL) {
    if !value.trim().is_empty() {
      return value;
    }
  }
  if let Ok(value) = std::env::var(ENV_AGENT_BASE_URL) {
    if !value.trim().is_empty() {
      return value;
    }
  }
  DEFAULT_AGENT_BASE_URL.to_string()
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  tauri::Builder::default()
    .plugin(
      tauri_plugin_log::Builder::new()
        .level(log::LevelFilter::Info)
        .build(),
    )
    .setup(|app| {
      let handle = app.handle();
      db::init_db(handle)?;

      let conn = db::connect(handle)?;
      let base_url = resolve_base_url(&conn);
      log::info!("workflow agent base url: {base_url}");

      let history = HistoryLog::new(db::load_history(&conn));
      log::info!("loaded {} history entries", history.len());

      app.manage(AppState {
        session: Mutex::new(Session::default()),
        history: Mutex::new(history),
        agent: AgentClient::new(base_url),
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::db_health,
      commands::analyze_page,
      commands::get_session,
      commands::dismiss_error,
      commands::restore_history_entry,
      commands::list_history,
      commands::delete_history_entry,
      commands::clear_history,
      commands::validate_inputs,
      commands::get_setting,
      commands::set_setting,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
