//! 도메인 모델.
//!
//! - [`order`] — 원격 "orders" 컬렉션의 주문 문서와 상태 필터
//! - [`notification`] — 데스크톱 알림 페이로드와 호출자 옵션
//! - [`feed`] — 라이브 쿼리 피드 이벤트

pub mod feed;
pub mod notification;
pub mod order;
