//! Stock location resolution
//!
//! 三种尺码模式各有一条解析分支，输出统一的 [`StockLocation`]，
//! 由唯一的 apply 路径消费，避免在各调用点重复分支逻辑。

use shared::models::{Product, SizeType};

use crate::db::repository::{RepoError, RepoResult};

/// 统一库存位句柄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLocation {
    pub product_id: String,
    pub variant_id: String,
    /// individual 模式下的尺码；free/none 模式为 None
    pub size: Option<String>,
}

impl StockLocation {
    /// 按商品的 size_type 解析库存位
    ///
    /// variant 不存在、individual 模式缺尺码或尺码未声明，
    /// 都按 NotFound 处理 (仅影响当前条目)。
    pub fn resolve(
        product_id: &str,
        product: &Product,
        variant_id: &str,
        size: Option<&str>,
    ) -> RepoResult<Self> {
        let variant = product
            .variants
            .iter()
            .find(|v| v.variant_id == variant_id)
            .ok_or_else(|| {
                RepoError::NotFound(format!(
                    "Variant {} not found on product {}",
                    variant_id, product_id
                ))
            })?;

        let size = match product.size_type {
            SizeType::Individual => {
                let size = size.ok_or_else(|| {
                    RepoError::NotFound(format!(
                        "Product {} is sized but no size was given",
                        product_id
                    ))
                })?;
                if !variant.sizes.iter().any(|s| s.size == size) {
                    return Err(RepoError::NotFound(format!(
                        "Size {} not found on variant {} of product {}",
                        size, variant_id, product_id
                    )));
                }
                Some(size.to_string())
            }
            // 均码/无尺码：variant 单行库存，尺码参数忽略
            SizeType::Free | SizeType::None => None,
        };

        Ok(StockLocation {
            product_id: product_id.to_string(),
            variant_id: variant_id.to_string(),
            size,
        })
    }
}
