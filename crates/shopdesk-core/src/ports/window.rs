//! 앱 창 포트.
//!
//! 알림 클릭 시 창 포커스와 앱 내부 이동에 사용한다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 메인 애플리케이션 창
#[async_trait]
pub trait AppWindow: Send + Sync {
    /// 창을 앞으로 가져오기
    async fn focus(&self) -> Result<(), CoreError>;

    /// 앱 내부 URL로 이동
    async fn navigate(&self, url: &str) -> Result<(), CoreError>;
}
