//! 주문 수 배지.
//!
//! 배지는 텍스트와 표시 여부 두 값으로 이루어진다. 셸은
//! [`WatchBadge::subscribe`]로 변경을 받아 화면 요소에 반영한다.

use shopdesk_core::ports::badge::BadgeView;
use tokio::sync::watch;
use tracing::debug;

/// 배지 상태 (텍스트 + 표시 여부)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeState {
    pub text: String,
    pub visible: bool,
}

impl BadgeState {
    /// 주문 수로 배지 상태 계산 (0이면 숨김)
    pub fn for_count(count: u64) -> Self {
        Self {
            text: count.to_string(),
            visible: count > 0,
        }
    }
}

/// watch 채널 기반 배지 — `BadgeView` 포트 구현
pub struct WatchBadge {
    tx: watch::Sender<BadgeState>,
}

impl WatchBadge {
    /// 숨겨진 배지로 시작
    pub fn new() -> Self {
        let (tx, _) = watch::channel(BadgeState::default());
        Self { tx }
    }

    /// 배지 변경 수신기
    pub fn subscribe(&self) -> watch::Receiver<BadgeState> {
        self.tx.subscribe()
    }

    /// 현재 배지 상태
    pub fn current(&self) -> BadgeState {
        self.tx.borrow().clone()
    }
}

impl Default for WatchBadge {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeView for WatchBadge {
    fn set_count(&self, count: u64) {
        let state = BadgeState::for_count(count);
        debug!("배지 갱신: {} (표시={})", state.text, state.visible);
        // 수신자가 없어도 값은 유지된다
        self.tx.send_replace(state);
    }
}
