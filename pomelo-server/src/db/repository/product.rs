//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use serde::Deserialize;
use shared::models::Product;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Debug, Deserialize)]
struct SoldQuantityRow {
    sold_quantity: i64,
}

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a product keyed by its business id
    pub async fn create(&self, id: &str, product: Product) -> RepoResult<Product> {
        let created: Option<Product> = self
            .base
            .db()
            .create((PRODUCT_TABLE, id))
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create product {}", id)))
    }

    /// Find product by business id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, id)).await?;
        Ok(product)
    }

    /// 调整销量聚合计数 (delivered 边界专用)
    ///
    /// 单语句 `+=` 更新，并发流转下不会丢失增量。
    pub async fn adjust_sold_quantity(&self, id: &str, delta: i64) -> RepoResult<i64> {
        let record = RecordId::from_table_key(PRODUCT_TABLE, id);
        let rows: Vec<SoldQuantityRow> = self
            .base
            .db()
            .query("UPDATE $product SET sold_quantity += $delta RETURN AFTER")
            .bind(("product", record))
            .bind(("delta", delta))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(|r| r.sold_quantity)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
