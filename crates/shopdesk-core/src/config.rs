//! 애플리케이션 설정 구조체.
//!
//! 주문 피드 서버, 로컬 저장소, 알림 표시 방식 등 런타임 설정을 정의한다.
//! [`crate::config_manager::ConfigManager`]가 JSON 파일로 로드/저장한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 주문 피드 설정
    pub feed: FeedConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
}

// ============================================================
// 주문 피드 설정
// ============================================================

/// 피드 수신 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    /// SSE 라이브 쿼리 스트림
    #[default]
    Stream,
    /// REST 주기 조회
    Poll,
}

/// 주문 피드 설정 — 원격 "orders" 컬렉션 구독
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// 서버 기본 URL
    pub base_url: String,
    /// 구독할 컬렉션 이름
    #[serde(default = "default_collection")]
    pub collection: String,
    /// 수신 방식
    #[serde(default)]
    pub mode: FeedMode,
    /// 폴링 주기 (밀리초, `mode = poll`일 때)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 재연결 최대 대기 (초)
    #[serde(default = "default_max_retry_secs")]
    pub max_retry_secs: u64,
    /// HTTP 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Bearer 토큰 (없으면 인증 헤더 생략)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 이름 (데이터 디렉토리 기준)
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file_name: default_db_file_name(),
        }
    }
}

// ============================================================
// 알림 설정
// ============================================================

/// 알림 설정 — 모든 알림에 적용되는 고정 아이콘/진동 패턴/알림음 볼륨
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 알림 아이콘 (파일 경로 또는 테마 아이콘 이름)
    #[serde(default = "default_icon")]
    pub icon: String,
    /// 배지 아이콘
    #[serde(default = "default_badge_icon")]
    pub badge_icon: String,
    /// 진동 패턴 (밀리초, 켜짐/꺼짐 반복)
    #[serde(default = "default_vibration_pattern")]
    pub vibration_pattern: Vec<u32>,
    /// 알림음 볼륨 (0.0 ~ 1.0)
    #[serde(default = "default_sound_volume")]
    pub sound_volume: f32,
    /// 호출자가 태그를 주지 않았을 때 사용할 태그
    #[serde(default = "default_tag")]
    pub default_tag: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            icon: default_icon(),
            badge_icon: default_badge_icon(),
            vibration_pattern: default_vibration_pattern(),
            sound_volume: default_sound_volume(),
            default_tag: default_tag(),
        }
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            feed: FeedConfig {
                base_url: "http://localhost:8080".to_string(),
                collection: default_collection(),
                mode: FeedMode::Stream,
                poll_interval_ms: default_poll_interval_ms(),
                max_retry_secs: default_max_retry_secs(),
                request_timeout_ms: default_request_timeout_ms(),
                api_key: None,
            },
            storage: StorageConfig::default(),
            notification: NotificationConfig::default(),
        }
    }

    /// HTTP 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.feed.request_timeout_ms)
    }

    /// 피드 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.feed.poll_interval_ms)
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), crate::error::CoreError> {
        use crate::error::CoreError;

        if self.feed.base_url.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "feed.base_url".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }
        if self.feed.collection.trim().is_empty() {
            return Err(CoreError::Validation {
                field: "feed.collection".to_string(),
                message: "비어 있을 수 없습니다".to_string(),
            });
        }
        if self.feed.poll_interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "feed.poll_interval_ms".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.notification.sound_volume) {
            return Err(CoreError::Validation {
                field: "notification.sound_volume".to_string(),
                message: format!("0.0 ~ 1.0 범위여야 합니다: {}", self.notification.sound_volume),
            });
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_collection() -> String {
    "orders".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_max_retry_secs() -> u64 {
    60
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_db_file_name() -> String {
    "shopdesk.db".to_string()
}

fn default_icon() -> String {
    "icons/icon-192.png".to_string()
}

fn default_badge_icon() -> String {
    "icons/badge-72.png".to_string()
}

fn default_vibration_pattern() -> Vec<u32> {
    vec![200, 100, 200]
}

fn default_sound_volume() -> f32 {
    0.5
}

fn default_tag() -> String {
    "shopdesk".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let json = r#"{"feed": {"base_url": "https://shop.example.com"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.feed.base_url, "https://shop.example.com");
        assert_eq!(config.feed.mode, FeedMode::Stream);
        assert_eq!(config.feed.collection, "orders");
        assert_eq!(config.notification.default_tag, "shopdesk");
        assert!((config.notification.sound_volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn feed_mode_lowercase() {
        let json = r#"{"feed": {"base_url": "http://x", "mode": "poll"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.feed.mode, FeedMode::Poll);
    }

    #[test]
    fn validate_rejects_bad_volume() {
        let mut config = AppConfig::default_config();
        config.notification.sound_volume = 1.5;
        assert!(config.validate().is_err());

        config.notification.sound_volume = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_url() {
        let mut config = AppConfig::default_config();
        config.feed.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn duration_helpers() {
        let config = AppConfig::default_config();
        assert_eq!(config.poll_interval(), Duration::from_millis(5_000));
        assert_eq!(config.request_timeout(), Duration::from_millis(10_000));
    }
}
