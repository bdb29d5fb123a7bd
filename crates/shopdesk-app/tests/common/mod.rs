//! 통합 테스트 공용 목 어댑터.

#![allow(dead_code)]

use async_trait::async_trait;
use shopdesk_core::error::CoreError;
use shopdesk_core::models::feed::FeedEvent;
use shopdesk_core::models::notification::{Notification, PermissionState};
use shopdesk_core::models::order::StatusFilter;
use shopdesk_core::ports::audio::AlertPlayer;
use shopdesk_core::ports::feed::{CountSubscription, OrderFeed, SubscriptionFeeder};
use shopdesk_core::ports::notifier::{DesktopNotifier, ShownNotification};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// 구독마다 채널을 열어 테스트가 직접 카운트를 밀어 넣는 피드
#[derive(Default)]
pub struct ChannelFeed {
    pub feeders: parking_lot::Mutex<Vec<SubscriptionFeeder>>,
}

impl ChannelFeed {
    pub fn sender(&self, index: usize) -> mpsc::Sender<FeedEvent> {
        self.feeders.lock()[index].tx.clone()
    }
}

#[async_trait]
impl OrderFeed for ChannelFeed {
    async fn subscribe(&self, _filter: &StatusFilter) -> Result<CountSubscription, CoreError> {
        let (subscription, feeder) = CountSubscription::channel(16);
        self.feeders.lock().push(feeder);
        Ok(subscription)
    }
}

/// 표시한 알림을 기록하는 알림기 (항상 권한 허용)
#[derive(Default)]
pub struct RecordingNotifier {
    pub shown: parking_lot::Mutex<Vec<Notification>>,
    activators: parking_lot::Mutex<Vec<oneshot::Sender<()>>>,
}

impl RecordingNotifier {
    pub fn bodies(&self) -> Vec<String> {
        self.shown.lock().iter().map(|n| n.body.clone()).collect()
    }
}

#[async_trait]
impl DesktopNotifier for RecordingNotifier {
    async fn request_permission(&self) -> Result<PermissionState, CoreError> {
        Ok(PermissionState::Granted)
    }

    async fn show(&self, notification: &Notification) -> Result<ShownNotification, CoreError> {
        let (tx, rx) = oneshot::channel();
        let mut shown = self.shown.lock();
        shown.push(notification.clone());
        self.activators.lock().push(tx);
        Ok(ShownNotification {
            id: shown.len() as u32,
            activated: rx,
        })
    }

    async fn close(&self, _id: u32) -> Result<(), CoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingPlayer {
    pub plays: AtomicU32,
}

impl CountingPlayer {
    pub fn plays(&self) -> u32 {
        self.plays.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertPlayer for CountingPlayer {
    async fn play(&self, _volume: f32) -> Result<(), CoreError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 조건이 참이 될 때까지 짧게 대기 (최대 약 2초)
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("조건이 시간 내에 충족되지 않음");
}
