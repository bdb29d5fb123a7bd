//! 알림음 재생 포트.
//!
//! 구현: `shopdesk-ui` crate

use async_trait::async_trait;

use crate::error::CoreError;

/// 내장 알림음 재생기
#[async_trait]
pub trait AlertPlayer: Send + Sync {
    /// 알림음 재생 (`volume`: 0.0 ~ 1.0)
    async fn play(&self, volume: f32) -> Result<(), CoreError>;
}
