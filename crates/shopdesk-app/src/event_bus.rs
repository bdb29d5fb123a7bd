//! 내부 이벤트 버스.
//!
//! `tokio::broadcast` 기반 내부 이벤트 라우팅. 셸(창, 트레이)은 구독만 한다.

use shopdesk_core::models::feed::FeedStatus;
use tokio::sync::broadcast;
use tracing::debug;

/// 내부 앱 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// 새 주문 감지
    NewOrders { delta: u64, total: u64 },
    /// 피드 상태 변경
    FeedStatusChanged(FeedStatus),
    /// 메인 창 포커스 요청
    FocusRequested,
    /// 앱 내부 이동 요청
    NavigateRequested(String),
}

/// 내부 이벤트 버스
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행
    pub fn publish(&self, event: AppEvent) {
        debug!("이벤트 발행: {:?}", event);
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::FeedStatusChanged(FeedStatus::Degraded));

        let event = rx.recv().await.unwrap();
        assert_eq!(event, AppEvent::FeedStatusChanged(FeedStatus::Degraded));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(AppEvent::NewOrders { delta: 2, total: 7 });

        assert!(matches!(rx1.recv().await.unwrap(), AppEvent::NewOrders { delta: 2, .. }));
        assert!(matches!(rx2.recv().await.unwrap(), AppEvent::NewOrders { total: 7, .. }));
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(AppEvent::FocusRequested);
    }
}
