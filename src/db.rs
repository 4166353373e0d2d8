use rusqlite::{Connection, OptionalExtension};
use tauri::{AppHandle, Manager};
use thiserror::Error;

use crate::models::{now_iso, HistoryEntry};

/// Key-value slot that holds the JSON-serialized history sequence.
pub const HISTORY_SLOT: &str = "seo-history";

#[derive(Debug, Error)]
pub enum DbError {
  #[error("tauri error: {0}")]
  Tauri(#[from] tauri::Error),
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),
  #[error("serialization error: {0}")]
  Serde(#[from] serde_json::Error),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub fn db_path(app: &AppHandle) -> Result<std::path::PathBuf, DbError> {
  let app_data = app.path().app_data_dir().map_err(DbError::Tauri)?;
  std::fs::create_dir_all(&app_data)?;
  Ok(app_data.join("metascope.sqlite"))
}

pub fn connect(app: &AppHandle) -> Result<Connection, DbError> {
  let conn = Connection::open(db_path(app)?)?;
  Ok(conn)
}

pub fn init_db(app: &AppHandle) -> Result<(), DbError> {
  let conn = connect(app)?;
  init_schema(&conn)
}

/// Apply migrations in order. Each uses IF NOT EXISTS for idempotency.
pub fn init_schema(conn: &Connection) -> Result<(), DbError> {
  let init_sql = include_str!("../migrations/001_init.sql");
  conn.execute_batch(init_sql)?;
  let settings_sql = include_str!("../migrations/002_settings.sql");
  conn.execute_batch(settings_sql)?;
  Ok(())
}

/// A missing slot, an unreadable store, or unparsable JSON all yield an empty
/// list; startup never fails on a bad history slot.
pub fn load_history(conn: &Connection) -> Vec<HistoryEntry> {
  let raw: Option<String> = match conn
    .query_row("SELECT value FROM kv_store WHERE key = ?1", [HISTORY_SLOT], |r| r.get(0))
    .optional()
  {
    Ok(v) => v,
    Err(e) => {
      log::warn!("history slot unreadable, starting empty: {e}");
      None
    }
  };

  match raw {
    Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
      log::warn!("history slot unparsable, starting empty: {e}");
      Vec::new()
    }),
    None => Vec::new(),
  }
}

pub fn save_history(conn: &Connection, entries: &[HistoryEntry]) -> Result<(), DbError> {
  let json = serde_json::to_string(entries)?;
  conn.execute(
    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
    (HISTORY_SLOT, &json, &now_iso()),
  )?;
  Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>, DbError> {
  let value: Option<String> = conn
    .query_row("SELECT value FROM settings WHERE key = ?1", [key], |r| r.get(0))
    .optional()?;
  Ok(value)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<(), DbError> {
  conn.execute(
    "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
    (key, value, &now_iso()),
  )?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::sample_metadata;
  use tempfile::TempDir;

  fn open_temp() -> (TempDir, Connection) {
    let temp = TempDir::new().unwrap();
    let conn = Connection::open(temp.path().join("metascope.sqlite")).unwrap();
    init_schema(&conn).unwrap();
    (temp, conn)
  }

  #[test]
  fn missing_slot_loads_empty() {
    let (_temp, conn) = open_temp();
    assert!(load_history(&conn).is_empty());
  }

  #[test]
  fn history_survives_save_and_load() {
    let (_temp, conn) = open_temp();
    let entries = vec![
      HistoryEntry::success("https://x.com".into(), "ab".into(), sample_metadata()),
      HistoryEntry::failure("https://y.com".into(), "cd".into(), "boom".into()),
    ];
    save_history(&conn, &entries).unwrap();
    assert_eq!(load_history(&conn), entries);
  }

  #[test]
  fn corrupt_slot_loads_empty() {
    let (_temp, conn) = open_temp();
    conn
      .execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
        (HISTORY_SLOT, "{not json", "2026-01-01T00:00:00Z"),
      )
      .unwrap();
    assert!(load_history(&conn).is_empty());
  }

  #[test]
  fn clearing_persists_an_empty_list() {
    let (_temp, conn) = open_temp();
    let entries = vec![HistoryEntry::failure("https://y.com".into(), "cd".into(), "boom".into())];
    save_history(&conn, &entries).unwrap();
    save_history(&conn, &[]).unwrap();
    assert!(load_history(&conn).is_empty());
  }

  #[test]
  fn settings_upsert_and_read_back() {
    let (_temp, conn) = open_temp();
    assert_eq!(get_setting(&conn, "agent_base_url").unwrap(), None);
    set_setting(&conn, "agent_base_url", "http://localhost:5678").unwrap();
    set_setting(&conn, "agent_base_url", "http://agent.internal:5678").unwrap();
    assert_eq!(
      get_setting(&conn, "agent_base_url").unwrap().as_deref(),
      Some("http://agent.internal:5678")
    );
  }
}
