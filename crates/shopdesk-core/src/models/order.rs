//! 주문 모델.
//!
//! 이 앱은 주문 문서를 읽기만 한다. 집계에 쓰는 것은 `status`뿐이며,
//! 생성 시각은 형식이 제각각이라 해석에 실패해도 문서를 버리지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// 주문 문서 (원격 컬렉션, 읽기 전용)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// 문서 ID
    #[serde(default)]
    pub id: String,
    /// 주문 상태 (없거나 문자열이 아니면 `Other`)
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: OrderStatus,
    /// 생성 시각
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// 구버전 문서의 생성 시각 필드
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Order {
    /// 생성 시각 (`createdAt` 우선, 없으면 `timestamp`)
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.timestamp)
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => OrderStatus::from(s),
        Value::Null => OrderStatus::default(),
        other => OrderStatus::Other(other.to_string()),
    })
}

/// RFC3339 문자열, `{seconds, nanoseconds}` 맵, epoch 밀리초를 받는다.
/// 그 밖의 값은 None.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_timestamp(&Value::deserialize(deserializer)?))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// 주문 상태
///
/// 알려지지 않은 문자열은 `Other`로 보존하며 어떤 필터와도 일치하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Ordered,
    Shipped,
    Paid,
    Returned,
    Other(String),
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Other(String::new())
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Paid => "Paid",
            OrderStatus::Returned => "Returned",
            OrderStatus::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ordered" => OrderStatus::Ordered,
            "Shipped" => OrderStatus::Shipped,
            "Paid" => OrderStatus::Paid,
            "Returned" => OrderStatus::Returned,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 라이브 쿼리 상태 필터 (`status ∈ {...}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    statuses: Vec<OrderStatus>,
}

impl StatusFilter {
    /// 지정한 상태 목록으로 필터 생성 (중복 제거, 순서 유지)
    pub fn new(statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        let mut unique: Vec<OrderStatus> = Vec::new();
        for status in statuses {
            if !unique.contains(&status) {
                unique.push(status);
            }
        }
        Self { statuses: unique }
    }

    /// 처리가 필요한 주문 상태: Ordered, Shipped
    pub fn actionable() -> Self {
        Self::new([OrderStatus::Ordered, OrderStatus::Shipped])
    }

    pub fn statuses(&self) -> &[OrderStatus] {
        &self.statuses
    }

    pub fn matches(&self, status: &OrderStatus) -> bool {
        !matches!(status, OrderStatus::Other(_)) && self.statuses.contains(status)
    }

    /// 필터와 일치하는 주문 수
    pub fn count_matching(&self, orders: &[Order]) -> u64 {
        orders.iter().filter(|o| self.matches(&o.status)).count() as u64
    }

    /// HTTP 쿼리 파라미터 (`status=Ordered&status=Shipped`)
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.statuses
            .iter()
            .map(|s| ("status", s.as_str().to_string()))
            .collect()
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::actionable()
    }
}
