//! SSE(Server-Sent Events) 라이브 쿼리 피드.
//!
//! `OrderFeed` 포트 구현. 자동 재연결 + exponential backoff.
//!
//! 서버 이벤트 형식:
//! - `count`: `{"count": N}` — 서버가 필터링한 결과 집합 크기
//! - `snapshot`: `{"orders": [...]}` — 문서 스냅샷, 클라이언트에서 다시 필터링
//! - `error`: 구독 수준 에러 메시지
//! - `heartbeat`: 무시

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::stream::StreamExt;
use shopdesk_core::error::CoreError;
use shopdesk_core::models::feed::FeedEvent;
use shopdesk_core::models::order::StatusFilter;
use shopdesk_core::ports::feed::{CountSubscription, OrderFeed, SubscriptionFeeder};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

use crate::backoff::Backoff;
use crate::payload::{CountPayload, OrdersPayload};
use crate::{collection_url, SUBSCRIPTION_BUFFER};

/// SSE 라이브 쿼리 피드 — `OrderFeed` 포트 구현
pub struct SseOrderFeed {
    base_url: String,
    collection: String,
    api_key: Option<String>,
    max_retry_secs: u64,
    http_client: reqwest::Client,
}

/// 한 번의 스트림 연결 결과
enum StreamOutcome {
    /// 서버가 스트림을 정상 종료
    Ended,
    /// 연결 또는 수신 실패
    Failed(String),
    /// 구독자가 수신 채널을 닫음
    ReceiverClosed,
}

impl SseOrderFeed {
    /// 새 SSE 피드 생성
    ///
    /// 스트림은 장시간 유지되므로 `timeout`은 연결 수립에만 적용한다.
    pub fn new(
        base_url: &str,
        collection: &str,
        api_key: Option<String>,
        timeout: Duration,
        max_retry_secs: u64,
    ) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key,
            max_retry_secs,
            http_client,
        })
    }

    /// SSE 이벤트 데이터를 FeedEvent로 파싱
    fn parse_event(event_type: &str, data: &str, filter: &StatusFilter) -> Option<FeedEvent> {
        match event_type {
            "count" => match serde_json::from_str::<CountPayload>(data) {
                Ok(payload) => Some(FeedEvent::Count(payload.count)),
                Err(e) => {
                    warn!("count 이벤트 파싱 실패: {e}");
                    None
                }
            },
            "snapshot" => match serde_json::from_str::<OrdersPayload>(data) {
                Ok(payload) => Some(FeedEvent::Count(
                    filter.count_matching(&payload.into_orders()),
                )),
                Err(e) => {
                    warn!("snapshot 이벤트 파싱 실패: {e}");
                    None
                }
            },
            "error" => Some(FeedEvent::Error(data.to_string())),
            "heartbeat" | "ping" => None,
            // 이벤트 타입이 없는 메시지는 count → snapshot 순으로 시도
            "" | "message" => {
                if let Ok(payload) = serde_json::from_str::<CountPayload>(data) {
                    Some(FeedEvent::Count(payload.count))
                } else if let Ok(payload) = serde_json::from_str::<OrdersPayload>(data) {
                    Some(FeedEvent::Count(
                        filter.count_matching(&payload.into_orders()),
                    ))
                } else {
                    debug!("해석할 수 없는 메시지: {data}");
                    None
                }
            }
            _ => {
                debug!("알 수 없는 SSE 이벤트 타입: {event_type}");
                None
            }
        }
    }
}

#[async_trait]
impl OrderFeed for SseOrderFeed {
    async fn subscribe(&self, filter: &StatusFilter) -> Result<CountSubscription, CoreError> {
        let url = collection_url(&self.base_url, &self.collection, "stream", filter)?;
        let (subscription, feeder) = CountSubscription::channel(SUBSCRIPTION_BUFFER);

        info!("SSE 구독 시작: {url}");

        let stream = StreamTask {
            client: self.http_client.clone(),
            url,
            api_key: self.api_key.clone(),
            filter: filter.clone(),
            max_retry_secs: self.max_retry_secs,
        };
        tokio::spawn(stream.run(feeder));

        Ok(subscription)
    }
}

/// 구독 하나를 담당하는 수신 태스크
struct StreamTask {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    filter: StatusFilter,
    max_retry_secs: u64,
}

impl StreamTask {
    async fn run(self, mut feeder: SubscriptionFeeder) {
        let mut backoff = Backoff::new(self.max_retry_secs);

        loop {
            let outcome = tokio::select! {
                _ = &mut feeder.teardown => {
                    info!("SSE 구독 해제");
                    return;
                }
                outcome = self.stream_once(&feeder.tx, &mut backoff) => outcome,
            };

            match outcome {
                StreamOutcome::ReceiverClosed => {
                    info!("SSE 이벤트 채널 닫힘, 연결 종료");
                    return;
                }
                StreamOutcome::Ended => {
                    info!("SSE 스트림 종료");
                }
                StreamOutcome::Failed(message) => {
                    warn!("SSE 스트림 에러: {message}");
                    if feeder.tx.send(FeedEvent::Error(message)).await.is_err() {
                        return;
                    }
                }
            }

            let delay = backoff.next_delay();
            warn!("SSE 재연결 대기: {}초", delay.as_secs());
            tokio::select! {
                _ = &mut feeder.teardown => {
                    info!("SSE 구독 해제");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn stream_once(
        &self,
        tx: &mpsc::Sender<FeedEvent>,
        backoff: &mut Backoff,
    ) -> StreamOutcome {
        let mut request = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(e) => return StreamOutcome::Failed(format!("연결 실패: {e}")),
        };

        debug!("SSE 연결 수립됨");
        backoff.reset();

        let mut events = response.bytes_stream().eventsource();
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    if let Some(feed_event) =
                        SseOrderFeed::parse_event(&event.event, &event.data, &self.filter)
                    {
                        if tx.send(feed_event).await.is_err() {
                            return StreamOutcome::ReceiverClosed;
                        }
                    }
                }
                Err(e) => return StreamOutcome::Failed(format!("수신 실패: {e}")),
            }
        }

        StreamOutcome::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> StatusFilter {
        StatusFilter::actionable()
    }

    #[test]
    fn parse_count_event() {
        let event = SseOrderFeed::parse_event("count", r#"{"count": 7}"#, &filter());
        assert_eq!(event, Some(FeedEvent::Count(7)));
    }

    #[test]
    fn parse_snapshot_filters_client_side() {
        let data = r#"{"orders": [
            {"id": "1", "status": "Ordered"},
            {"id": "2", "status": "Shipped"},
            {"id": "3", "status": "Paid"},
            {"id": "4", "status": "Returned"}
        ]}"#;
        let event = SseOrderFeed::parse_event("snapshot", data, &filter());
        assert_eq!(event, Some(FeedEvent::Count(2)));
    }

    #[test]
    fn parse_snapshot_with_mixed_timestamp_formats() {
        let data = r#"{"orders": [
            {"id": "1", "status": "Ordered", "createdAt": {"seconds": 1772442900, "nanoseconds": 0}},
            {"id": "2", "status": "Shipped", "createdAt": "03/02/2026"},
            {"id": "3", "status": "Ordered", "createdAt": "2026-03-02T09:15:00Z", "timestamp": "2026-03-02T09:15:00Z"},
            {"id": "4", "status": "Paid", "timestamp": 1772442900000}
        ]}"#;
        let event = SseOrderFeed::parse_event("snapshot", data, &filter());
        assert_eq!(event, Some(FeedEvent::Count(3)));
    }

    #[test]
    fn parse_error_event() {
        let event = SseOrderFeed::parse_event("error", "permission-denied", &filter());
        assert_eq!(
            event,
            Some(FeedEvent::Error("permission-denied".to_string()))
        );
    }

    #[test]
    fn parse_heartbeat_is_ignored() {
        assert!(SseOrderFeed::parse_event("heartbeat", "{}", &filter()).is_none());
    }

    #[test]
    fn parse_untyped_message() {
        assert_eq!(
            SseOrderFeed::parse_event("message", r#"{"count": 2}"#, &filter()),
            Some(FeedEvent::Count(2))
        );
        assert_eq!(
            SseOrderFeed::parse_event("", r#"[{"id": "1", "status": "Ordered"}]"#, &filter()),
            Some(FeedEvent::Count(1))
        );
        assert!(SseOrderFeed::parse_event("message", "plain text", &filter()).is_none());
    }

    #[test]
    fn parse_malformed_count() {
        assert!(SseOrderFeed::parse_event("count", "{oops", &filter()).is_none());
    }

    #[test]
    fn parse_unknown_event() {
        assert!(SseOrderFeed::parse_event("unknown_type", "data", &filter()).is_none());
    }

    #[tokio::test]
    async fn stream_delivers_counts_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/collections/orders/stream")
            .match_query(mockito::Matcher::Regex("status=Ordered".to_string()))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(
                "event: count\ndata: {\"count\": 3}\n\n\
                 event: heartbeat\ndata: {}\n\n\
                 event: count\ndata: {\"count\": 4}\n\n",
            )
            .expect_at_least(1)
            .create_async()
            .await;

        let feed =
            SseOrderFeed::new(&server.url(), "orders", None, Duration::from_secs(5), 1).unwrap();
        let mut sub = feed.subscribe(&filter()).await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();

        assert_eq!(first, Some(FeedEvent::Count(3)));
        assert_eq!(second, Some(FeedEvent::Count(4)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/collections/orders/stream")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let feed =
            SseOrderFeed::new(&server.url(), "orders", None, Duration::from_secs(5), 1).unwrap();
        let mut sub = feed.subscribe(&filter()).await.unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert!(matches!(event, Some(FeedEvent::Error(_))));
    }
}
