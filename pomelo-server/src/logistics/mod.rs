//! 外部物流 API 对接
//!
//! - [`LogisticsClient`] - reqwest 客户端：托运单收入结算、快递状态查询
//! - [`OrderStatusCache`] - 快递状态只读缓存 (TTL + 一次有界重试)

pub mod client;
pub mod status_cache;

pub use client::{CourierStatus, LogisticsClient, LookupError};
pub use status_cache::OrderStatusCache;
