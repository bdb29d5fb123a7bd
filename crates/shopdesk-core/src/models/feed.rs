//! 라이브 쿼리 피드 이벤트.

/// 피드가 구독자에게 전달하는 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// 필터와 일치하는 현재 결과 집합 크기
    Count(u64),
    /// 구독 수준 에러 (어댑터는 이후 재연결을 시도한다)
    Error(String),
}

/// 피드 상태 (UI 표시용)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// 정상 수신 중
    Live,
    /// 에러 후 재연결 대기 (배지 값이 오래되었을 수 있음)
    Degraded,
    /// 구독 종료
    Stopped,
}
