//! Order API Module
//!
//! 订单的创建/查询/状态流转/删除。所有接口都要求 Bearer 认证；
//! 流转允许 admin/moderator，创建与删除仅 admin。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/status", post(handler::update_status))
        .route(
            "/{order_id}",
            get(handler::get_by_id).delete(handler::delete),
        )
}
