//! Inventory API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/adjust", post(handler::adjust))
}
