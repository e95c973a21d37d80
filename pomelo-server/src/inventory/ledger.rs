//! Inventory Ledger
//!
//! 可用库存的读写入口。批量调整时逐项独立成败，
//! 不提供跨条目原子性，N 条调整可能部分成功。

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{ProductRepository, RepoError, RepoResult, StockRepository};
use crate::inventory::StockLocation;

/// 一次库存调整请求 (delta 正负均可)
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub product_id: String,
    pub variant_id: String,
    pub size: Option<String>,
    pub delta: i64,
}

/// 单条调整的结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOutcome {
    pub product_id: String,
    pub variant_id: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_availability: Option<i64>,
}

// =============================================================================
// Inventory Ledger
// =============================================================================

#[derive(Clone)]
pub struct InventoryLedger {
    products: ProductRepository,
    stock: StockRepository,
}

impl InventoryLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            stock: StockRepository::new(db),
        }
    }

    /// 调整单个库存位，返回调整后的可用量
    ///
    /// 解析失败 (商品/variant/尺码不存在) 与余量不足都只影响本条目。
    pub async fn apply(&self, adjustment: &StockAdjustment) -> RepoResult<i64> {
        let product = self
            .products
            .find_by_id(&adjustment.product_id)
            .await?
            .ok_or_else(|| {
                RepoError::NotFound(format!("Product {} not found", adjustment.product_id))
            })?;

        let location = StockLocation::resolve(
            &adjustment.product_id,
            &product,
            &adjustment.variant_id,
            adjustment.size.as_deref(),
        )?;

        self.stock
            .apply_delta(
                &location.product_id,
                &location.variant_id,
                location.size.as_deref(),
                adjustment.delta,
            )
            .await
    }

    /// 批量调整，返回逐项结果
    pub async fn apply_batch(&self, adjustments: &[StockAdjustment]) -> Vec<AdjustmentOutcome> {
        let mut outcomes = Vec::with_capacity(adjustments.len());
        for adjustment in adjustments {
            let outcome = match self.apply(adjustment).await {
                Ok(new_availability) => AdjustmentOutcome {
                    product_id: adjustment.product_id.clone(),
                    variant_id: adjustment.variant_id.clone(),
                    success: true,
                    message: "Stock updated".to_string(),
                    new_availability: Some(new_availability),
                },
                Err(e) => {
                    tracing::warn!(
                        product = %adjustment.product_id,
                        variant = %adjustment.variant_id,
                        delta = adjustment.delta,
                        error = %e,
                        "Stock adjustment rejected"
                    );
                    AdjustmentOutcome {
                        product_id: adjustment.product_id.clone(),
                        variant_id: adjustment.variant_id.clone(),
                        success: false,
                        message: e.to_string(),
                        new_availability: None,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
