//! 주문 수 배지 포트.
//!
//! 구현: `shopdesk-ui` crate (watch 채널 기반 배지 상태)

/// 화면에 표시되는 미처리 주문 수 배지
pub trait BadgeView: Send + Sync {
    /// 배지 값 갱신 (0이면 숨김)
    fn set_count(&self, count: u64);
}
