//! Domain Models
//!
//! 订单与商品模型。状态流转规则见 server 侧 `orders` 模块。

pub mod order;
pub mod product;

pub use order::{CartLine, Order, OrderStatus, OrderType};
pub use product::{Product, ProductVariant, SizeEntry, SizeType};
