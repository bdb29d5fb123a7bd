//! 주문 라이브 쿼리 포트.
//!
//! 구현: `shopdesk-network` crate (SSE 스트림, REST 폴링)
//!
//! 구독은 업데이트 수신 채널과 해제 핸들의 쌍이다. 해제 핸들을 소비하거나
//! drop하면 어댑터의 수신 태스크가 종료된다.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::error::CoreError;
use crate::models::feed::FeedEvent;
use crate::models::order::StatusFilter;

/// 주문 컬렉션 라이브 쿼리
#[async_trait]
pub trait OrderFeed: Send + Sync {
    /// 필터와 일치하는 결과 집합 크기를 변경될 때마다 전달하는 구독 생성
    async fn subscribe(&self, filter: &StatusFilter) -> Result<CountSubscription, CoreError>;
}

/// 활성 구독 (구독자 측)
#[derive(Debug)]
pub struct CountSubscription {
    updates: mpsc::Receiver<FeedEvent>,
    teardown: SubscriptionTeardown,
}

/// 어댑터 측 송신부
#[derive(Debug)]
pub struct SubscriptionFeeder {
    /// 업데이트 송신 채널
    pub tx: mpsc::Sender<FeedEvent>,
    /// 구독 해제 신호 (값 수신 또는 송신부 drop 시 해제)
    pub teardown: oneshot::Receiver<()>,
}

impl CountSubscription {
    /// 구독/송신부 쌍 생성
    pub fn channel(capacity: usize) -> (Self, SubscriptionFeeder) {
        let (tx, rx) = mpsc::channel(capacity);
        let (teardown_tx, teardown_rx) = oneshot::channel();
        (
            Self {
                updates: rx,
                teardown: SubscriptionTeardown(Some(teardown_tx)),
            },
            SubscriptionFeeder {
                tx,
                teardown: teardown_rx,
            },
        )
    }

    /// 다음 업데이트 대기 (피드가 닫히면 None)
    pub async fn next(&mut self) -> Option<FeedEvent> {
        self.updates.recv().await
    }

    /// 수신 채널과 해제 핸들 분리
    pub fn into_parts(self) -> (mpsc::Receiver<FeedEvent>, SubscriptionTeardown) {
        (self.updates, self.teardown)
    }
}

/// 구독 해제 핸들
#[derive(Debug)]
pub struct SubscriptionTeardown(Option<oneshot::Sender<()>>);

impl SubscriptionTeardown {
    /// 해제 신호 발송
    pub fn teardown(mut self) {
        self.send();
    }

    fn send(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for SubscriptionTeardown {
    fn drop(&mut self) {
        self.send();
    }
}
