//! Pomelo Shared - 订单与库存领域模型
//!
//! 服务端与客户端共用的纯数据类型，不依赖数据库驱动。
//!
//! # 模块结构
//!
//! - [`models`] - 订单、商品、库存领域模型

pub mod models;

// Re-export 公共类型
pub use models::{
    CartLine, Order, OrderStatus, OrderType, Product, ProductVariant, SizeEntry, SizeType,
};
