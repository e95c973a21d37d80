//! Product Model
//!
//! 商品主档：尺码模式、销量计数、规格列表。
//! 可用库存不嵌在 variants 里，由 server 侧 stock 表单独维护，
//! 保证增减操作是单语句原子更新。

use serde::{Deserialize, Serialize};

/// 商品尺码模式，决定库存定位方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeType {
    /// 按尺码独立计库存 (variant + size 定位)
    Individual,
    /// 均码，按 variant 定位
    Free,
    /// 无尺码概念，按 variant 定位
    None,
}

/// 尺码声明。商品结构信息，库存量在 stock 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeEntry {
    pub size: String,
}

/// 商品规格 (颜色/款式等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub variant_id: String,
    pub buying_price: f64,
    /// 仅 size_type=individual 时非空
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<SizeEntry>,
}

/// Product entity，record key 为业务商品 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub size_type: SizeType,
    /// 已交付件数聚合计数，只在订单跨越 delivered 边界时变动
    pub sold_quantity: i64,
    pub variants: Vec<ProductVariant>,
}
