//! 키-값 설정 저장 (`KeyValueStore` 포트).

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use shopdesk_core::error::CoreError;
use shopdesk_core::ports::storage::KeyValueStore;
use tracing::debug;

use super::SqliteStorage;

#[async_trait]
impl KeyValueStore for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;

        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| CoreError::Storage(format!("설정 조회 실패 ({key}): {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CoreError::Internal(format!("잠금 획득 실패: {e}")))?;

        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value],
        )
        .map_err(|e| CoreError::Storage(format!("설정 저장 실패 ({key}): {e}")))?;

        debug!("설정 저장: {key}={value}");
        Ok(())
    }
}
