//! Logistics API Module
//!
//! 快递状态查询，经 [`crate::logistics::OrderStatusCache`] 缓存直通。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/logistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/status/{external_id}", get(handler::lookup_status))
}
