//! # shopdesk-core
//!
//! SHOPDESK 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 주문, 알림, 피드 이벤트 등 도메인 데이터 구조체
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::order::{Order, OrderStatus, StatusFilter};

    #[test]
    fn order_serde_roundtrip() {
        let json = r#"{"id":"ord_001","status":"Ordered","createdAt":"2026-03-02T09:15:00Z"}"#;
        let order: Order = serde_json::from_str(json).unwrap();

        assert_eq!(order.id, "ord_001");
        assert_eq!(order.status, OrderStatus::Ordered);

        let back = serde_json::to_string(&order).unwrap();
        assert!(back.contains("\"createdAt\""));
        assert!(back.contains("\"Ordered\""));
    }

    #[test]
    fn actionable_filter_matches_open_orders_only() {
        let filter = StatusFilter::actionable();
        assert!(filter.matches(&OrderStatus::Ordered));
        assert!(filter.matches(&OrderStatus::Shipped));
        assert!(!filter.matches(&OrderStatus::Paid));
        assert!(!filter.matches(&OrderStatus::Returned));
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.feed.collection, "orders");
        assert_eq!(config.feed.poll_interval_ms, 5_000);
        assert_eq!(config.feed.max_retry_secs, 60);
        assert_eq!(config.notification.vibration_pattern, vec![200, 100, 200]);
        assert_eq!(config.storage.db_file_name, "shopdesk.db");
    }
}
