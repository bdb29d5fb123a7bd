//! 셸 창 어댑터.
//!
//! `AppWindow` 포트 구현. 포커스/이동 요청을 이벤트 버스로 셸에 넘긴다.

use async_trait::async_trait;
use shopdesk_core::error::CoreError;
use shopdesk_core::ports::window::AppWindow;
use std::sync::Arc;
use tracing::debug;

use crate::event_bus::{AppEvent, EventBus};

/// 이벤트 버스 기반 창 — `AppWindow` 포트 구현
pub struct ShellWindow {
    events: Arc<EventBus>,
}

impl ShellWindow {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl AppWindow for ShellWindow {
    async fn focus(&self) -> Result<(), CoreError> {
        debug!("창 포커스 요청");
        self.events.publish(AppEvent::FocusRequested);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), CoreError> {
        if url.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "url".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }
        debug!("이동 요청: {url}");
        self.events.publish(AppEvent::NavigateRequested(url.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn focus_then_navigate_are_published_in_order() {
        let bus = Arc::new(EventBus::new(8));
        let mut rx = bus.subscribe();
        let window = ShellWindow::new(bus.clone());

        window.focus().await.unwrap();
        window.navigate("/orders?status=Ordered").await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::FocusRequested);
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::NavigateRequested("/orders?status=Ordered".to_string())
        );
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let window = ShellWindow::new(Arc::new(EventBus::default()));
        assert!(window.navigate(" ").await.is_err());
    }
}
