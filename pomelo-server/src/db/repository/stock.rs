//! Stock Repository
//!
//! stock 表是可用库存的唯一权威来源，一行对应一个库存位
//! (individual 商品: variant + size；free/none 商品: variant 单行)。

use super::{BaseRepository, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 库存行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    /// 商品业务 ID
    pub product: String,
    pub variant_id: String,
    /// individual 商品的尺码；free/none 商品为 NONE
    pub size: Option<String>,
    pub availability: i64,
}

#[derive(Debug, Deserialize)]
struct AvailabilityRow {
    availability: i64,
}

// =============================================================================
// Stock Repository
// =============================================================================

#[derive(Clone)]
pub struct StockRepository {
    base: BaseRepository,
}

impl StockRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a stock row for one location
    pub async fn create(&self, row: StockRow) -> RepoResult<StockRow> {
        let created: Option<StockRow> = self.base.db().create("stock").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create stock row".to_string()))
    }

    /// All stock rows of a product (for assembling the product view)
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<StockRow>> {
        let rows: Vec<StockRow> = self
            .base
            .db()
            .query("SELECT * FROM stock WHERE product = $product")
            .bind(("product", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// 原子调整一个库存位的可用量
    ///
    /// 非负约束在 WHERE 子句里由数据库判定，拒绝时存量保持不变。
    /// 返回调整后的可用量。
    pub async fn apply_delta(
        &self,
        product_id: &str,
        variant_id: &str,
        size: Option<&str>,
        delta: i64,
    ) -> RepoResult<i64> {
        let update = if size.is_some() {
            "UPDATE stock SET availability += $delta \
             WHERE product = $product AND variant_id = $variant AND size = $size \
             AND (availability + $delta) >= 0 RETURN AFTER"
        } else {
            "UPDATE stock SET availability += $delta \
             WHERE product = $product AND variant_id = $variant \
             AND (size IS NONE OR size IS NULL) \
             AND (availability + $delta) >= 0 RETURN AFTER"
        };

        let mut request = self
            .base
            .db()
            .query(update)
            .bind(("product", product_id.to_string()))
            .bind(("variant", variant_id.to_string()))
            .bind(("delta", delta));
        if let Some(s) = size {
            request = request.bind(("size", s.to_string()));
        }

        let rows: Vec<AvailabilityRow> = request.await?.take(0)?;
        if let Some(row) = rows.into_iter().next() {
            return Ok(row.availability);
        }

        // 更新未命中：区分「库存位不存在」与「余量不足」
        let current = self.current_availability(product_id, variant_id, size).await?;
        match current {
            Some(available) => Err(RepoError::InsufficientStock(format!(
                "Stock for {}/{} would go negative ({} + {})",
                product_id, variant_id, available, delta
            ))),
            None => Err(RepoError::NotFound(format!(
                "Stock location {}/{}{} not found",
                product_id,
                variant_id,
                size.map(|s| format!("/{}", s)).unwrap_or_default()
            ))),
        }
    }

    async fn current_availability(
        &self,
        product_id: &str,
        variant_id: &str,
        size: Option<&str>,
    ) -> RepoResult<Option<i64>> {
        let select = if size.is_some() {
            "SELECT availability FROM stock \
             WHERE product = $product AND variant_id = $variant AND size = $size"
        } else {
            "SELECT availability FROM stock \
             WHERE product = $product AND variant_id = $variant \
             AND (size IS NONE OR size IS NULL)"
        };

        let mut request = self
            .base
            .db()
            .query(select)
            .bind(("product", product_id.to_string()))
            .bind(("variant", variant_id.to_string()));
        if let Some(s) = size {
            request = request.bind(("size", s.to_string()));
        }

        let rows: Vec<AvailabilityRow> = request.await?.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.availability))
    }
}
