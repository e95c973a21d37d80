//! Logistics API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::{CurrentUser, require_staff};
use crate::core::ServerState;
use crate::logistics::LookupError;
use crate::utils::{AppError, AppResult, ok};

/// 快递状态查询 (只读缓存直通)
///
/// 重试一次后仍失败时，把上游的状态码与报文原样透传给调用方。
pub async fn lookup_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(external_id): Path<String>,
) -> AppResult<Response> {
    require_staff(&user)?;

    match state.status_cache.lookup(&external_id).await {
        Ok(status) => Ok(ok(status).into_response()),
        Err(LookupError::Upstream { status, body, .. }) => {
            tracing::warn!(
                external_id = %external_id,
                upstream_status = status,
                "Courier status lookup failed, propagating upstream response"
            );
            let code =
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((code, body).into_response())
        }
        Err(LookupError::Transport(msg)) => Err(AppError::Upstream(msg)),
    }
}
