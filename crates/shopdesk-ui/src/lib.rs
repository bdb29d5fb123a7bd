//! # shopdesk-ui
//!
//! 데스크톱 UI 어댑터.
//!
//! - [`notifier`] — `DesktopNotifier` 포트 구현 (notify-rust)
//! - [`badge`] — `BadgeView` 포트 구현 (watch 채널로 셸에 배지 상태 전달)
//! - [`sound`] — `AlertPlayer` 포트 구현 (내장 알림음)

pub mod badge;
pub mod notifier;
pub mod sound;
