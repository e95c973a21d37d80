//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use shared::models::{CartLine, Order, OrderStatus, OrderType};

use crate::auth::{CurrentUser, require_admin, require_staff};
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::orders::{OrderDeletionWorkflow, StatusTransitionEngine};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// 后台手工建单请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub cart: Vec<CartLineRequest>,
    pub consignment_id: Option<String>,
    #[serde(default = "default_order_type")]
    pub order_type: OrderType,
}

fn default_order_type() -> OrderType {
    OrderType::Manual
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: String,
    pub variant_id: String,
    pub selected_size: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

/// 创建手工订单 (订单号由原子序列签发)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    require_admin(&user)?;

    if payload.cart.is_empty() {
        return Err(AppError::Validation("Cart must not be empty".to_string()));
    }
    for line in &payload.cart {
        if line.product_id.is_empty() || line.variant_id.is_empty() {
            return Err(AppError::Validation(
                "Cart line is missing productId or variantId".to_string(),
            ));
        }
        if line.quantity <= 0 {
            return Err(AppError::Validation(format!(
                "Cart line quantity must be positive, got {}",
                line.quantity
            )));
        }
    }

    let repo = OrderRepository::new(state.db.clone());
    let order_id = repo.next_order_id().await?;
    let now = Utc::now();
    let order = Order {
        order_id,
        status: OrderStatus::Pending,
        cart: payload
            .cart
            .into_iter()
            .map(|line| CartLine {
                product_id: line.product_id,
                variant_id: line.variant_id,
                selected_size: line.selected_size,
                quantity: line.quantity,
                price: line.price,
            })
            .collect(),
        consignment_id: payload.consignment_id,
        total_revenue: None,
        order_type: payload.order_type,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(order).await?;
    tracing::info!(order_id, "Manual order created");
    Ok(ok(created))
}

/// Get order by business id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    require_staff(&user)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_order_id(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;
    Ok(ok(order))
}

/// 状态流转请求
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
}

/// 订单状态流转
///
/// delivered + 托运单号时同步结算收入；上游失败整体中止，返回 502。
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StatusChangeRequest>,
) -> AppResult<Json<AppResponse<StatusChangeData>>> {
    require_staff(&user)?;

    let engine = StatusTransitionEngine::new(state.db.clone(), state.logistics.clone());
    let outcome = engine.transition(payload.order_id, payload.status).await?;

    Ok(ok_with_message(
        StatusChangeData {
            total_revenue: outcome.revenue,
        },
        "Order status updated",
    ))
}

/// 删除订单 (returned 以外的状态会回补库存)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<serde_json::Value>>> {
    require_admin(&user)?;

    let workflow = OrderDeletionWorkflow::new(state.db.clone());
    workflow.delete(order_id).await?;

    Ok(ok_with_message(
        serde_json::json!({ "orderID": order_id }),
        "Order deleted",
    ))
}
