//! # shopdesk-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite 기반 키-값 저장소와 스키마 마이그레이션을 관리한다.
//! 마지막으로 관측한 주문 수와 알림음 설정이 여기에 남아
//! 앱 재시작 후에도 유지된다.
//!
//! ## 모듈
//! - `sqlite`: 키-값 저장소 (KeyValueStore 구현)
//! - `migration`: 스키마 마이그레이션

pub mod migration;
pub mod sqlite;
