//! 데스크톱 알림 포트.
//!
//! 구현: `shopdesk-ui` crate (notify-rust)

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::CoreError;
use crate::models::notification::{Notification, PermissionState};

/// 표시된 알림 핸들
#[derive(Debug)]
pub struct ShownNotification {
    /// 플랫폼 알림 ID
    pub id: u32,
    /// 사용자가 알림을 클릭하면 값이 도착한다. 송신부가 drop되면
    /// 활성화 없이 닫힌 것이다.
    pub activated: oneshot::Receiver<()>,
}

/// 권한 기반 플랫폼 알림 인터페이스
#[async_trait]
pub trait DesktopNotifier: Send + Sync {
    /// 알림 표시 권한 요청
    async fn request_permission(&self) -> Result<PermissionState, CoreError>;

    /// 알림 표시
    async fn show(&self, notification: &Notification) -> Result<ShownNotification, CoreError>;

    /// 알림 닫기
    async fn close(&self, id: u32) -> Result<(), CoreError>;
}
