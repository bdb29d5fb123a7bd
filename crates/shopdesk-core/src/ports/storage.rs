//! 로컬 키-값 저장소 포트.
//!
//! 구현: `shopdesk-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;

/// 마지막 주문 수 키 (정수 문자열)
pub const LAST_ORDER_COUNT_KEY: &str = "lastOrderCount";

/// 알림음 설정 키 ("true" / "false")
pub const SOUND_ENABLED_KEY: &str = "soundEnabled";

/// 재시작 후에도 유지되는 문자열 키-값 저장소
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 값 조회 (없으면 None)
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (기존 값 덮어쓰기)
    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}
