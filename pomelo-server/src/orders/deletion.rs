//! Order Deletion Workflow
//!
//! 删除订单文档后，除 returned 状态外按购物车行回补库存
//! (returned 订单的库存已在退货流程里对账过)。
//! 回补批量逐项独立成败，失败不撤销删除，只记录错误。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::models::{Order, OrderStatus};

use crate::db::repository::OrderRepository;
use crate::inventory::{InventoryLedger, StockAdjustment};
use crate::utils::{AppError, AppResult};

// =============================================================================
// Order Deletion Workflow
// =============================================================================

#[derive(Clone)]
pub struct OrderDeletionWorkflow {
    orders: OrderRepository,
    ledger: InventoryLedger,
}

impl OrderDeletionWorkflow {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            ledger: InventoryLedger::new(db),
        }
    }

    /// 删除订单，按需回补库存
    pub async fn delete(&self, order_id: i64) -> AppResult<Order> {
        let deleted = self
            .orders
            .delete_by_order_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if deleted.status == OrderStatus::Returned {
            tracing::info!(order_id, "Order deleted, restock skipped (returned)");
            return Ok(deleted);
        }

        let adjustments: Vec<StockAdjustment> = deleted
            .cart
            .iter()
            .map(|line| StockAdjustment {
                product_id: line.product_id.clone(),
                variant_id: line.variant_id.clone(),
                size: line.selected_size.clone(),
                delta: line.quantity,
            })
            .collect();

        let outcomes = self.ledger.apply_batch(&adjustments).await;
        let failed = outcomes.iter().filter(|o| !o.success).count();
        if failed > 0 {
            // 订单已删除，不撤销；留痕等待对账
            tracing::error!(
                order_id,
                failed,
                total = outcomes.len(),
                "Restock after order deletion partially failed"
            );
        }

        tracing::info!(
            order_id,
            restocked = outcomes.len() - failed,
            "Order deleted"
        );
        Ok(deleted)
    }
}
