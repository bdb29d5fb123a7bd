//! REST 폴링 피드.
//!
//! 스트리밍을 지원하지 않는 서버용 `OrderFeed` 구현.
//! 주기적으로 문서 목록을 조회하고, 필터와 일치하는 주문 집합이
//! 바뀌었을 때만 새 결과 집합 크기를 전달한다.

use async_trait::async_trait;
use shopdesk_core::error::CoreError;
use shopdesk_core::models::feed::FeedEvent;
use shopdesk_core::models::order::{Order, StatusFilter};
use shopdesk_core::ports::feed::{CountSubscription, OrderFeed, SubscriptionFeeder};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::backoff::Backoff;
use crate::payload::OrdersPayload;
use crate::{collection_url, SUBSCRIPTION_BUFFER};

/// REST 폴링 피드 — `OrderFeed` 포트 구현
pub struct PollingOrderFeed {
    base_url: String,
    collection: String,
    api_key: Option<String>,
    interval: Duration,
    max_retry_secs: u64,
    http_client: reqwest::Client,
}

impl PollingOrderFeed {
    /// 새 폴링 피드 생성
    pub fn new(
        base_url: &str,
        collection: &str,
        api_key: Option<String>,
        timeout: Duration,
        interval: Duration,
        max_retry_secs: u64,
    ) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key,
            interval,
            max_retry_secs,
            http_client,
        })
    }
}

#[async_trait]
impl OrderFeed for PollingOrderFeed {
    async fn subscribe(&self, filter: &StatusFilter) -> Result<CountSubscription, CoreError> {
        let url = collection_url(&self.base_url, &self.collection, "documents", filter)?;
        let (subscription, feeder) = CountSubscription::channel(SUBSCRIPTION_BUFFER);

        info!("폴링 구독 시작: {url} (주기 {}ms)", self.interval.as_millis());

        let task = PollTask {
            client: self.http_client.clone(),
            url,
            api_key: self.api_key.clone(),
            filter: filter.clone(),
            interval: self.interval,
            max_retry_secs: self.max_retry_secs,
        };
        tokio::spawn(task.run(feeder));

        Ok(subscription)
    }
}

struct PollTask {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    filter: StatusFilter,
    interval: Duration,
    max_retry_secs: u64,
}

impl PollTask {
    async fn run(self, mut feeder: SubscriptionFeeder) {
        let mut backoff = Backoff::new(self.max_retry_secs);
        let mut last_ids: Option<Vec<String>> = None;

        loop {
            let wait = match self.fetch().await {
                Ok(orders) => {
                    backoff.reset();
                    let ids = matching_ids(&orders, &self.filter);
                    if last_ids.as_ref() != Some(&ids) {
                        let count = ids.len() as u64;
                        debug!("폴링 결과 변경: {count}건");
                        if feeder.tx.send(FeedEvent::Count(count)).await.is_err() {
                            info!("폴링 이벤트 채널 닫힘, 종료");
                            return;
                        }
                        last_ids = Some(ids);
                    }
                    self.interval
                }
                Err(e) => {
                    warn!("폴링 실패: {e}");
                    if feeder.tx.send(FeedEvent::Error(e.to_string())).await.is_err() {
                        return;
                    }
                    backoff.next_delay()
                }
            };

            tokio::select! {
                _ = &mut feeder.teardown => {
                    info!("폴링 구독 해제");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<Order>, CoreError> {
        let mut request = self.client.get(self.url.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("주문 조회 실패: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Network(format!("주문 조회 실패: HTTP {status}")));
        }

        let payload: OrdersPayload = response
            .json()
            .await
            .map_err(|e| CoreError::FeedFormat(format!("주문 목록 파싱 실패: {e}")))?;

        Ok(payload.into_orders())
    }
}

/// 필터와 일치하는 주문 ID (정렬됨, 집합 비교용)
fn matching_ids(orders: &[Order], filter: &StatusFilter) -> Vec<String> {
    let mut ids: Vec<String> = orders
        .iter()
        .filter(|o| filter.matches(&o.status))
        .map(|o| o.id.clone())
        .collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::models::order::OrderStatus;

    const BODY: &str = r#"[
        {"id": "b", "status": "Ordered", "createdAt": "2026-03-02T09:15:00Z"},
        {"id": "a", "status": "Shipped"},
        {"id": "c", "status": "Paid"}
    ]"#;

    fn feed(url: &str) -> PollingOrderFeed {
        PollingOrderFeed::new(
            url,
            "orders",
            Some("secret".to_string()),
            Duration::from_secs(5),
            Duration::from_millis(50),
            1,
        )
        .unwrap()
    }

    #[test]
    fn matching_ids_sorted_and_filtered() {
        let orders = vec![
            Order {
                id: "z".to_string(),
                status: OrderStatus::Ordered,
                created_at: None,
                timestamp: None,
            },
            Order {
                id: "y".to_string(),
                status: OrderStatus::Returned,
                created_at: None,
                timestamp: None,
            },
            Order {
                id: "x".to_string(),
                status: OrderStatus::Shipped,
                created_at: None,
                timestamp: None,
            },
        ];
        assert_eq!(
            matching_ids(&orders, &StatusFilter::actionable()),
            vec!["x".to_string(), "z".to_string()]
        );
    }

    #[tokio::test]
    async fn first_poll_emits_count() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/collections/orders/documents")
            .match_query(mockito::Matcher::Regex("status=Shipped".to_string()))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .expect_at_least(1)
            .create_async()
            .await;

        let mut sub = feed(&server.url())
            .subscribe(&StatusFilter::actionable())
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert_eq!(event, Some(FeedEvent::Count(2)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unchanged_result_is_not_repeated() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/collections/orders/documents")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let mut sub = feed(&server.url())
            .subscribe(&StatusFilter::actionable())
            .await
            .unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert_eq!(first, Some(FeedEvent::Count(2)));

        // 같은 결과가 여러 번 조회되어도 추가 이벤트 없음
        let second = tokio::time::timeout(Duration::from_millis(300), sub.next()).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn mixed_timestamp_formats_still_count() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/collections/orders/documents")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "1", "status": "Ordered"},
                    {"id": "2", "status": "Shipped", "createdAt": "03/02/2026"},
                    {"id": "3", "status": "Ordered", "createdAt": {"seconds": 1772442900, "nanoseconds": 0}},
                    {"id": "4", "status": "Shipped", "createdAt": "2026-03-02T09:15:00Z", "timestamp": "2026-03-02T09:15:00Z"}
                ]"#,
            )
            .create_async()
            .await;

        let mut sub = feed(&server.url())
            .subscribe(&StatusFilter::actionable())
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert_eq!(event, Some(FeedEvent::Count(4)));
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/collections/orders/documents")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut sub = feed(&server.url())
            .subscribe(&StatusFilter::actionable())
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert!(matches!(event, Some(FeedEvent::Error(_))));
    }
}
