//! SQLite 저장소 어댑터.
//!
//! `KeyValueStore` 포트 구현.
//!
//! # 모듈 구조
//! - `settings`: 키-값 설정 저장 (KeyValueStore 포트)

mod settings;

use rusqlite::Connection;
use shopdesk_core::error::CoreError;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::migration;

/// SQLite 저장소 — `KeyValueStore` 포트 구현
pub struct SqliteStorage {
    pub(super) conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("SQLite 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}
