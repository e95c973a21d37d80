//! Order Model
//!
//! 订单主档：状态、购物车行、物流托运单号、已结算收入。
//! 订单由外部结算流程创建 (status=pending)，之后仅允许状态流转与删除。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status lifecycle
///
/// 任意状态之间都允许流转；只有跨越 `delivered` 边界时才有副作用
/// (sold_quantity 计数与收入结算)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    Refund,
}

impl OrderStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
            OrderStatus::Refund => "refund",
        }
    }
}

/// Order origin，仅用于报表，不影响生命周期规则
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Web,
    Manual,
}

/// 购物车行项目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub variant_id: String,
    /// 仅 size_type=individual 的商品需要
    pub selected_size: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 业务订单号，由原子序列签发，单调递增但不保证无空洞
    pub order_id: i64,
    pub status: OrderStatus,
    pub cart: Vec<CartLine>,
    /// 外部物流托运单号
    pub consignment_id: Option<String>,
    /// 仅在 delivered 且流转时存在托运单号的订单上出现
    pub total_revenue: Option<f64>,
    pub order_type: OrderType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");

        let parsed: OrderStatus = serde_json::from_str("\"refund\"").unwrap();
        assert_eq!(parsed, OrderStatus::Refund);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<OrderStatus>("\"archived\"").is_err());
    }
}
