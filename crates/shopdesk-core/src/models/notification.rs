//! 알림 모델.
//!
//! 알림은 저장하지 않는다. 같은 `tag`의 알림은 플랫폼이 교체한다.

use serde::{Deserialize, Serialize};

/// 새 주문 알림 태그
pub const NEW_ORDER_TAG: &str = "new-order";

/// 새 주문 알림 제목
pub const NEW_ORDER_TITLE: &str = "New Order";

/// 알림 권한 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// 사용자가 응답하지 않고 닫음
    Dismissed,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// 표시할 알림 (고정 아이콘/진동 패턴이 적용된 최종 형태)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// 중복 방지/교체용 태그
    pub tag: String,
    pub icon: String,
    pub badge_icon: String,
    /// 진동 패턴 (밀리초)
    pub vibration_pattern: Vec<u32>,
    /// 사용자가 상호작용할 때까지 유지
    pub require_interaction: bool,
    /// 활성화 시 이동할 앱 내부 URL
    pub url: Option<String>,
}

/// `notify` 호출자가 덮어쓸 수 있는 옵션
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub tag: Option<String>,
    pub icon: Option<String>,
    pub badge_icon: Option<String>,
    pub vibration_pattern: Option<Vec<u32>>,
    pub require_interaction: Option<bool>,
    pub url: Option<String>,
}

impl NotificationOptions {
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_require_interaction(mut self, value: bool) -> Self {
        self.require_interaction = Some(value);
        self
    }
}

/// 새 주문 알림 본문 ("You have N new order(s)!")
pub fn new_order_message(delta: u64) -> String {
    let plural = if delta == 1 { "" } else { "s" };
    format!("You have {delta} new order{plural}!")
}
