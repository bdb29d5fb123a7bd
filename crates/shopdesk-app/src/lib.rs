//! # shopdesk-app
//!
//! SHOPDESK 데스크톱 앱의 오케스트레이션 계층.
//! 주문 피드를 구독해 새 주문 알림과 배지를 관리하는 [`notification_manager`],
//! 셸과의 내부 이벤트 라우팅([`event_bus`]), 종료 처리([`lifecycle`])를 제공한다.
//! 바이너리(`main.rs`)는 여기서 어댑터를 와이어링만 한다.

pub mod event_bus;
pub mod lifecycle;
pub mod notification_manager;
pub mod shell_window;
