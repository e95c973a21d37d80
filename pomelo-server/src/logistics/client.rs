//! Logistics API client
//!
//! 对外部物流/快递服务的两类调用：
//! - 托运单详情 → 结算收入 (单次调用，不重试)
//! - 订单状态查询 (由 [`super::OrderStatusCache`] 负责缓存与重试)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{AppError, AppResult};

/// 快递侧订单状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierStatus {
    pub consignment_id: String,
    pub order_status: String,
    pub updated_at: String,
}

/// 状态查询失败
#[derive(Debug, Error)]
pub enum LookupError {
    /// 上游给出了响应：保留状态码与报文原样向外传播
    #[error("Upstream answered {status}")]
    Upstream {
        status: u16,
        body: String,
        /// 429/5xx 响应携带的 Retry-After 头，原样保留给重试方
        retry_after: Option<String>,
    },

    /// 传输层失败 (连接、超时等)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl LookupError {
    /// 429 与 5xx 允许一次有界重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LookupError::Upstream { status, .. } if *status == 429 || (500..=599).contains(status)
        )
    }
}

// =============================================================================
// Logistics Client
// =============================================================================

#[derive(Clone)]
pub struct LogisticsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl LogisticsClient {
    pub fn new(base_url: String, api_token: Option<String>, timeout_ms: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// 把托运单号换算成已实现收入：`order_amount - total_fee`
    ///
    /// 仅调用一次，不重试。非成功响应或字段缺失/非数值一律按上游错误处理，
    /// 绝不静默缺省为零。
    pub async fn resolve_revenue(&self, consignment_id: &str) -> AppResult<f64> {
        let response = self
            .get(&format!("/consignments/{}", consignment_id))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Logistics API unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Logistics API returned {} for consignment {}",
                status, consignment_id
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed logistics payload: {}", e)))?;

        let order_amount = payload.get("order_amount").and_then(|v| v.as_f64());
        let total_fee = payload.get("total_fee").and_then(|v| v.as_f64());
        match (order_amount, total_fee) {
            (Some(amount), Some(fee)) => Ok(amount - fee),
            _ => Err(AppError::Upstream(format!(
                "Logistics payload for consignment {} is missing a numeric order_amount/total_fee",
                consignment_id
            ))),
        }
    }

    /// 单次状态查询，重试策略在缓存层
    pub async fn fetch_status(&self, external_id: &str) -> Result<CourierStatus, LookupError> {
        let response = self
            .get(&format!("/order-status/{}", external_id))
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(http::header::RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string());
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Upstream {
                status: status.as_u16(),
                body,
                retry_after,
            });
        }

        response
            .json::<CourierStatus>()
            .await
            .map_err(|e| LookupError::Transport(format!("Malformed status payload: {}", e)))
    }
}
