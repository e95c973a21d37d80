//! Inventory API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::inventory::{AdjustmentOutcome, InventoryLedger, StockAdjustment};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// 批量库存调整请求
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub updates: Vec<AdjustItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustItem {
    pub product_id: String,
    pub variant_id: String,
    pub size: Option<String>,
    /// 调整量，正数进货/回补，负数扣减
    pub quantity: i64,
}

/// 批量调整库存
///
/// 请求整体合法即返回 200，条目各自成败在 results 里报告。
/// 没有跨条目原子性，N 条调整可能部分成功。
pub async fn adjust(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AdjustRequest>,
) -> AppResult<Json<AppResponse<Vec<AdjustmentOutcome>>>> {
    require_admin(&user)?;

    if payload.updates.is_empty() {
        return Err(AppError::Validation("updates must not be empty".to_string()));
    }
    for item in &payload.updates {
        if item.product_id.is_empty() || item.variant_id.is_empty() {
            return Err(AppError::Validation(
                "Update item is missing productId or variantId".to_string(),
            ));
        }
        if item.quantity == 0 {
            return Err(AppError::Validation(
                "Update item quantity must be non-zero".to_string(),
            ));
        }
    }

    let adjustments: Vec<StockAdjustment> = payload
        .updates
        .into_iter()
        .map(|item| StockAdjustment {
            product_id: item.product_id,
            variant_id: item.variant_id,
            size: item.size,
            delta: item.quantity,
        })
        .collect();

    let ledger = InventoryLedger::new(state.db.clone());
    let results = ledger.apply_batch(&adjustments).await;
    Ok(ok(results))
}
