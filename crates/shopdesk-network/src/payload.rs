//! 피드 응답 페이로드.

use serde::Deserialize;
use shopdesk_core::models::order::Order;

/// 서버가 집계한 결과 집합 크기 (`{"count": N}`)
#[derive(Debug, Deserialize)]
pub(crate) struct CountPayload {
    pub count: u64,
}

/// 주문 문서 스냅샷 (`{"orders": [...]}` 또는 `[...]`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrdersPayload {
    Wrapped { orders: Vec<Order> },
    List(Vec<Order>),
}

impl OrdersPayload {
    pub fn into_orders(self) -> Vec<Order> {
        match self {
            OrdersPayload::Wrapped { orders } => orders,
            OrdersPayload::List(orders) => orders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_snapshot_shapes_parse() {
        let wrapped: OrdersPayload =
            serde_json::from_str(r#"{"orders":[{"id":"1","status":"Ordered"}]}"#).unwrap();
        let list: OrdersPayload =
            serde_json::from_str(r#"[{"id":"1","status":"Ordered"},{"id":"2","status":"Paid"}]"#)
                .unwrap();

        assert_eq!(wrapped.into_orders().len(), 1);
        assert_eq!(list.into_orders().len(), 2);
    }
}
