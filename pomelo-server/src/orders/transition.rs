//! Status Transition Engine
//!
//! 订单状态机。任意状态间都允许流转，只有跨越 delivered 边界才有副作用：
//! 进入 delivered 时按购物车行累加各商品的 sold_quantity，离开时等量回退。
//!
//! 执行顺序：先结算收入 (如需要)，再写状态，最后调整计数。
//! 上游失败时整个流转中止，订单与计数都保持原样；
//! 状态写成功之后的计数失败只记录错误，留给对账任务处理。

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::models::OrderStatus;

use crate::db::repository::{OrderRepository, ProductRepository};
use crate::logistics::LogisticsClient;
use crate::utils::{AppError, AppResult};

/// 一次流转的结果
#[derive(Debug)]
pub struct TransitionOutcome {
    /// delivered + 托运单号流转时结算出的收入
    pub revenue: Option<f64>,
}

// =============================================================================
// Status Transition Engine
// =============================================================================

#[derive(Clone)]
pub struct StatusTransitionEngine {
    orders: OrderRepository,
    products: ProductRepository,
    logistics: LogisticsClient,
}

impl StatusTransitionEngine {
    pub fn new(db: Surreal<Db>, logistics: LogisticsClient) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
            logistics,
        }
    }

    /// 把订单流转到新状态
    pub async fn transition(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> AppResult<TransitionOutcome> {
        let order = self
            .orders
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
        let previous = order.status;

        // 1. 收入结算先于状态写入：持久化出去的 delivered + 托运单号
        //    必须携带有效 total_revenue。失败即中止，订单不被触碰。
        let revenue = match (&new_status, &order.consignment_id) {
            (OrderStatus::Delivered, Some(consignment_id)) => {
                Some(self.logistics.resolve_revenue(consignment_id).await?)
            }
            // 无托运单号的 delivered：人工/不可追踪交付，只写状态
            _ => None,
        };

        // 2. 状态 (+收入) 一条 UPDATE 落库
        let updated = self
            .orders
            .update_status(order_id, new_status, revenue, Utc::now())
            .await?;
        if updated.is_none() {
            return Err(AppError::Internal(format!(
                "Status write for order {} matched no document",
                order_id
            )));
        }

        // 3. delivered 边界计数。previous == new == delivered 不属于任何一侧。
        if previous.is_delivered() != new_status.is_delivered() {
            let sign: i64 = if new_status.is_delivered() { 1 } else { -1 };
            self.adjust_sold_quantities(&order.cart, sign, order_id).await;
        }

        tracing::info!(
            order_id,
            from = previous.as_str(),
            to = new_status.as_str(),
            revenue = ?revenue,
            "Order status updated"
        );
        Ok(TransitionOutcome { revenue })
    }

    async fn adjust_sold_quantities(
        &self,
        cart: &[shared::models::CartLine],
        sign: i64,
        order_id: i64,
    ) {
        for line in cart {
            let delta = sign * line.quantity;
            if let Err(e) = self
                .products
                .adjust_sold_quantity(&line.product_id, delta)
                .await
            {
                // 状态已落库，这里不回滚；留痕等待对账
                tracing::error!(
                    order_id,
                    product = %line.product_id,
                    delta,
                    error = %e,
                    "sold_quantity adjustment failed after status write"
                );
            }
        }
    }
}
