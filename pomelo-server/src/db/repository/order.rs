//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "orders";

#[derive(Debug, Deserialize)]
struct SequenceRow {
    value: i64,
}

// =============================================================================
// Order Repository
// =============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// 签发下一个订单号
    ///
    /// 单语句 UPSERT 计数器，替代扫描最大值再探测的写法；
    /// orders.order_id 上的唯一索引作为兜底。
    pub async fn next_order_id(&self) -> RepoResult<i64> {
        let rows: Vec<SequenceRow> = self
            .base
            .db()
            .query("UPSERT sequence:orders SET value += 1 RETURN AFTER")
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(|r| r.value)
            .ok_or_else(|| RepoError::Database("Order sequence returned no value".to_string()))
    }

    /// Create a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by business order id
    pub async fn find_by_order_id(&self, order_id: i64) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE order_id = $order_id")
            .bind(("order_id", order_id))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// 持久化新状态 (可选携带已结算收入)，单条 UPDATE 完成
    ///
    /// 返回 None 表示写入未匹配任何文档，调用方按持久化异常处理。
    pub async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        total_revenue: Option<f64>,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let query = if total_revenue.is_some() {
            "UPDATE orders SET status = $status, total_revenue = $revenue, updated_at = $updated_at \
             WHERE order_id = $order_id RETURN AFTER"
        } else {
            "UPDATE orders SET status = $status, updated_at = $updated_at \
             WHERE order_id = $order_id RETURN AFTER"
        };

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("order_id", order_id))
            .bind(("status", status))
            .bind(("updated_at", updated_at));
        if let Some(revenue) = total_revenue {
            request = request.bind(("revenue", revenue));
        }

        let orders: Vec<Order> = request.await?.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// 删除订单并返回删除前的文档 (购物车行项用于回补库存)
    pub async fn delete_by_order_id(&self, order_id: i64) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("DELETE orders WHERE order_id = $order_id RETURN BEFORE")
            .bind(("order_id", order_id))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }
}
