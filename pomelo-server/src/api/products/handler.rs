//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{Product, ProductVariant, SizeEntry, SizeType};

use crate::auth::{CurrentUser, require_admin, require_staff};
use crate::core::ServerState;
use crate::db::repository::stock::StockRow;
use crate::db::repository::{ProductRepository, StockRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// 建档请求：商品结构 + 各库存位的初始可用量
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub id: String,
    pub size_type: SizeType,
    pub variants: Vec<VariantRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    pub variant_id: String,
    pub buying_price: f64,
    /// individual 模式：每个尺码一条
    #[serde(default)]
    pub sizes: Vec<SizeRequest>,
    /// free/none 模式：variant 单库存位
    pub availability: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SizeRequest {
    pub size: String,
    pub availability: i64,
}

/// 创建商品及其库存位
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<AppResponse<ProductView>>> {
    require_admin(&user)?;
    validate(&payload)?;

    let product = Product {
        size_type: payload.size_type,
        sold_quantity: 0,
        variants: payload
            .variants
            .iter()
            .map(|v| ProductVariant {
                variant_id: v.variant_id.clone(),
                buying_price: v.buying_price,
                sizes: v
                    .sizes
                    .iter()
                    .map(|s| SizeEntry {
                        size: s.size.clone(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let products = ProductRepository::new(state.db.clone());
    let stock = StockRepository::new(state.db.clone());
    let created = products.create(&payload.id, product).await?;

    for variant in &payload.variants {
        match payload.size_type {
            SizeType::Individual => {
                for size in &variant.sizes {
                    stock
                        .create(StockRow {
                            product: payload.id.clone(),
                            variant_id: variant.variant_id.clone(),
                            size: Some(size.size.clone()),
                            availability: size.availability,
                        })
                        .await?;
                }
            }
            SizeType::Free | SizeType::None => {
                stock
                    .create(StockRow {
                        product: payload.id.clone(),
                        variant_id: variant.variant_id.clone(),
                        size: None,
                        availability: variant.availability.unwrap_or(0),
                    })
                    .await?;
            }
        }
    }

    tracing::info!(product = %payload.id, "Product created");
    let rows = stock.find_by_product(&payload.id).await?;
    Ok(ok(assemble_view(payload.id, created, rows)))
}

/// 商品详情 (含各库存位可用量)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ProductView>>> {
    require_staff(&user)?;

    let products = ProductRepository::new(state.db.clone());
    let product = products
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    let rows = StockRepository::new(state.db.clone())
        .find_by_product(&id)
        .await?;
    Ok(ok(assemble_view(id, product, rows)))
}

fn validate(payload: &CreateProductRequest) -> AppResult<()> {
    if payload.id.is_empty() {
        return Err(AppError::Validation("Product id must not be empty".to_string()));
    }
    if payload.variants.is_empty() {
        return Err(AppError::Validation("variants must not be empty".to_string()));
    }
    for variant in &payload.variants {
        if variant.variant_id.is_empty() {
            return Err(AppError::Validation("variantId must not be empty".to_string()));
        }
        match payload.size_type {
            SizeType::Individual => {
                if variant.sizes.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Variant {} needs at least one size",
                        variant.variant_id
                    )));
                }
                if variant.sizes.iter().any(|s| s.availability < 0) {
                    return Err(AppError::Validation(
                        "Initial availability must not be negative".to_string(),
                    ));
                }
            }
            SizeType::Free | SizeType::None => {
                if variant.availability.is_some_and(|a| a < 0) {
                    return Err(AppError::Validation(
                        "Initial availability must not be negative".to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

// ========== View assembly ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub size_type: SizeType,
    pub sold_quantity: i64,
    pub variants: Vec<VariantView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub variant_id: String,
    pub buying_price: f64,
    pub stock: Vec<StockView>,
}

#[derive(Debug, Serialize)]
pub struct StockView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub availability: i64,
}

fn assemble_view(id: String, product: Product, rows: Vec<StockRow>) -> ProductView {
    let variants = product
        .variants
        .into_iter()
        .map(|variant| {
            let stock = rows
                .iter()
                .filter(|row| row.variant_id == variant.variant_id)
                .map(|row| StockView {
                    size: row.size.clone(),
                    availability: row.availability,
                })
                .collect();
            VariantView {
                variant_id: variant.variant_id,
                buying_price: variant.buying_price,
                stock,
            }
        })
        .collect();

    ProductView {
        id,
        size_type: product.size_type,
        sold_quantity: product.sold_quantity,
        variants,
    }
}
