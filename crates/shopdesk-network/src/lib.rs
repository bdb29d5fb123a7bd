//! # shopdesk-network
//!
//! 원격 "orders" 컬렉션 라이브 쿼리 어댑터.
//! `OrderFeed` 포트를 SSE 스트림 또는 REST 폴링으로 구현하며,
//! 연결 실패 시 exponential backoff로 재연결한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use shopdesk_network::create_order_feed;
//!
//! let feed = create_order_feed(&config)?;
//! let mut sub = feed.subscribe(&StatusFilter::actionable()).await?;
//! while let Some(event) = sub.next().await { /* ... */ }
//! ```

pub mod backoff;
mod payload;
pub mod poll_feed;
pub mod sse_feed;

use shopdesk_core::config::{AppConfig, FeedMode};
use shopdesk_core::error::CoreError;
use shopdesk_core::models::order::StatusFilter;
use shopdesk_core::ports::feed::OrderFeed;
use std::sync::Arc;
use url::Url;

use crate::poll_feed::PollingOrderFeed;
use crate::sse_feed::SseOrderFeed;

/// 구독 채널 버퍼 크기 (업데이트가 몰려도 순서대로 대기)
pub(crate) const SUBSCRIPTION_BUFFER: usize = 64;

/// 설정의 `feed.mode`에 맞는 피드 어댑터 생성
pub fn create_order_feed(config: &AppConfig) -> Result<Arc<dyn OrderFeed>, CoreError> {
    let feed = &config.feed;
    let feed: Arc<dyn OrderFeed> = match feed.mode {
        FeedMode::Stream => Arc::new(SseOrderFeed::new(
            &feed.base_url,
            &feed.collection,
            feed.api_key.clone(),
            config.request_timeout(),
            feed.max_retry_secs,
        )?),
        FeedMode::Poll => Arc::new(PollingOrderFeed::new(
            &feed.base_url,
            &feed.collection,
            feed.api_key.clone(),
            config.request_timeout(),
            config.poll_interval(),
            feed.max_retry_secs,
        )?),
    };
    Ok(feed)
}

/// `{base}/collections/{collection}/{suffix}?status=...` URL 생성
pub(crate) fn collection_url(
    base_url: &str,
    collection: &str,
    suffix: &str,
    filter: &StatusFilter,
) -> Result<Url, CoreError> {
    let raw = format!(
        "{}/collections/{}/{}",
        base_url.trim_end_matches('/'),
        collection,
        suffix
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| CoreError::Config(format!("잘못된 피드 URL: {raw}: {e}")))?;
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in filter.query_pairs() {
            query.append_pair(key, &value);
        }
    }
    Ok(url)
}
