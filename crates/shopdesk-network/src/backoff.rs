//! 재연결 대기 시간 계산.
//!
//! 1초에서 시작해 실패할 때마다 두 배, 최대 `max_secs`.

use std::time::Duration;

/// exponential backoff 상태
#[derive(Debug, Clone)]
pub struct Backoff {
    current_secs: u64,
    max_secs: u64,
}

impl Backoff {
    pub fn new(max_secs: u64) -> Self {
        Self {
            current_secs: 1,
            max_secs: max_secs.max(1),
        }
    }

    /// 이번 대기 시간을 반환하고 다음 값을 두 배로 늘린다
    pub fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.current_secs);
        self.current_secs = (self.current_secs * 2).min(self.max_secs);
        delay
    }

    /// 연결 성공 시 초기화
    pub fn reset(&mut self) {
        self.current_secs = 1;
    }
}
