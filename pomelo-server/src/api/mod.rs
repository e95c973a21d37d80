//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单：创建、查询、状态流转、删除
//! - [`inventory`] - 库存批量调整
//! - [`products`] - 商品管理
//! - [`logistics`] - 快递状态查询 (缓存直通)

pub mod health;
pub mod inventory;
pub mod logistics;
pub mod orders;
pub mod products;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 组装全部路由
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(inventory::router())
        .merge(products::router())
        .merge(logistics::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
