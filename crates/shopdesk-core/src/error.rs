//! SHOPDESK 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 라이브러리 에러를 `map_err`로 `CoreError`에 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 로컬 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 서버가 예상과 다른 응답을 보냄
    #[error("피드 응답 형식 오류: {0}")]
    FeedFormat(String),

    /// 알림 표시 실패
    #[error("알림 에러: {0}")]
    Notification(String),

    /// 알림음 재생 실패
    #[error("재생 에러: {0}")]
    Playback(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
