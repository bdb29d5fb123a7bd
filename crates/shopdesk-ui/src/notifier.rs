//! 데스크톱 알림 어댑터.
//!
//! `DesktopNotifier` 포트 구현. notify-rust 기반.
//!
//! XDG(Linux/BSD)에서는 같은 태그의 이전 알림을 교체하고, 기본 액션(클릭)을
//! 활성화로 전달한다. 액션 대기는 블로킹 스레드 하나가 플랫폼 알림 ID 하나를
//! 맡는다. 같은 태그로 교체된 알림은 ID가 같으므로 기존 대기 스레드를 그대로 쓰고
//! 활성화 송신부만 바꾼다.

use async_trait::async_trait;
use notify_rust::{Notification as OsNotification, Timeout};
use parking_lot::Mutex;
use shopdesk_core::error::CoreError;
use shopdesk_core::models::notification::{Notification, PermissionState};
use shopdesk_core::ports::notifier::{DesktopNotifier, ShownNotification};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// 알림 앱 이름
const APP_NAME: &str = "SHOPDESK";

/// 태그에 걸린 표시 중인 알림
#[derive(Debug)]
struct Slot {
    id: u32,
    activated: Option<oneshot::Sender<()>>,
}

/// 태그 → 표시 중인 알림. 대기 스레드와 공유한다.
#[derive(Debug, Default)]
struct TagSlots {
    slots: Mutex<HashMap<String, Slot>>,
}

impl TagSlots {
    fn id_for(&self, tag: &str) -> Option<u32> {
        self.slots.lock().get(tag).map(|slot| slot.id)
    }

    /// 표시된 알림 등록. 반환값의 bool은 이 ID에 새 대기 스레드가 필요한지 여부.
    ///
    /// 교체된 이전 알림의 활성화 수신기는 값 없이 닫힌다.
    fn register(&self, tag: &str, id: u32) -> (oneshot::Receiver<()>, bool) {
        let (tx, rx) = oneshot::channel();
        let mut slots = self.slots.lock();
        let already_waiting = slots.get(tag).is_some_and(|slot| slot.id == id);
        slots.insert(
            tag.to_string(),
            Slot {
                id,
                activated: Some(tx),
            },
        );
        (rx, !already_waiting)
    }

    fn activate(&self, id: u32) {
        let mut slots = self.slots.lock();
        for slot in slots.values_mut().filter(|slot| slot.id == id) {
            if let Some(tx) = slot.activated.take() {
                let _ = tx.send(());
            }
        }
    }

    /// 대기 스레드 종료 시 (알림이 닫힘)
    fn release(&self, id: u32) {
        self.slots.lock().retain(|_, slot| slot.id != id);
    }
}

/// 데스크톱 알림 어댑터 — `DesktopNotifier` 포트 구현
///
/// 플랫폼 제약:
/// - `badge_icon`, `vibration_pattern`은 데스크톱 알림 서버에 대응 항목이 없어 무시한다.
/// - `close`는 OS 알림을 직접 닫지 않는다. 핸들은 액션 대기 스레드가 소유하며,
///   XDG 서버는 기본 액션 후 알림을 스스로 닫는다 (resident 알림을 쓰는 서버는 예외).
/// - macOS/Windows에서는 클릭을 받을 수 없어 활성화가 일어나지 않는다.
pub struct DesktopNotifierImpl {
    tags: Arc<TagSlots>,
}

impl DesktopNotifierImpl {
    /// 새 알림 어댑터 생성
    pub fn new() -> Self {
        Self {
            tags: Arc::new(TagSlots::default()),
        }
    }

    fn build(&self, notification: &Notification) -> OsNotification {
        let mut os = OsNotification::new();
        os.summary(&notification.title)
            .body(&notification.body)
            .icon(&notification.icon)
            .appname(APP_NAME);

        if notification.require_interaction {
            os.timeout(Timeout::Never);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            use notify_rust::Hint;

            os.action("default", "열기");
            os.hint(Hint::Category("x-shopdesk.order".to_string()));
            if let Some(prev) = self.tags.id_for(&notification.tag) {
                os.id(prev);
            }
        }

        os
    }
}

impl Default for DesktopNotifierImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DesktopNotifier for DesktopNotifierImpl {
    async fn request_permission(&self) -> Result<PermissionState, CoreError> {
        // 데스크톱 알림 서버는 권한을 묻지 않는다. XDG에서는 서버가 없으면 거부로 본다.
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let server = tokio::task::spawn_blocking(notify_rust::get_server_information)
                .await
                .map_err(|e| CoreError::Notification(format!("알림 서버 확인 실패: {e}")))?;
            match server {
                Ok(info) => {
                    debug!("알림 서버: {} {}", info.name, info.version);
                    Ok(PermissionState::Granted)
                }
                Err(e) => {
                    warn!("알림 서버 없음: {e}");
                    Ok(PermissionState::Denied)
                }
            }
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            Ok(PermissionState::Granted)
        }
    }

    async fn show(&self, notification: &Notification) -> Result<ShownNotification, CoreError> {
        debug!("알림: {} [{}]", notification.title, notification.tag);

        let os = self.build(notification);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let handle = tokio::task::spawn_blocking(move || os.show())
                .await
                .map_err(|e| CoreError::Notification(format!("알림 태스크 실패: {e}")))?
                .map_err(|e| CoreError::Notification(format!("알림 표시 실패: {e}")))?;

            let id = handle.id();
            let (activated, needs_waiter) = self.tags.register(&notification.tag, id);

            if needs_waiter {
                let tags = Arc::clone(&self.tags);
                tokio::task::spawn_blocking(move || {
                    handle.wait_for_action(|action| {
                        if action == "default" {
                            tags.activate(id);
                        }
                    });
                    tags.release(id);
                });
            } else {
                debug!("알림 {id} 교체, 기존 대기 스레드 사용");
            }

            Ok(ShownNotification { id, activated })
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            tokio::task::spawn_blocking(move || os.show().map(|_| ()))
                .await
                .map_err(|e| CoreError::Notification(format!("알림 태스크 실패: {e}")))?
                .map_err(|e| CoreError::Notification(format!("알림 표시 실패: {e}")))?;
            let (_, activated) = oneshot::channel();

            Ok(ShownNotification { id: 0, activated })
        }
    }

    async fn close(&self, id: u32) -> Result<(), CoreError> {
        debug!("알림 처리 완료: {id}");
        Ok(())
    }
}
