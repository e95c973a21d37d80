//! Order status lookup cache
//!
//! 以托运单号为键的只读缓存。命中且未过期直接返回；
//! 未命中时调用上游一次，429/5xx 按 Retry-After 等待后恰好重试一次，
//! 第二次失败把上游状态码与报文原样向外传播。
//!
//! 不做 single-flight：同一个键并发未命中时各自走上游。

use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{CourierStatus, LogisticsClient, LookupError};

/// Retry-After 解析失败时的固定退避
const DEFAULT_BACKOFF: Duration = Duration::from_millis(800);

struct CacheEntry {
    status: CourierStatus,
    expires_at: Instant,
}

// =============================================================================
// Order Status Cache
// =============================================================================

pub struct OrderStatusCache {
    client: LogisticsClient,
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl OrderStatusCache {
    pub fn new(client: LogisticsClient, ttl: Duration) -> Self {
        Self {
            client,
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Read-through lookup
    pub async fn lookup(&self, external_id: &str) -> Result<CourierStatus, LookupError> {
        if let Some(entry) = self.entries.get(external_id)
            && entry.expires_at > Instant::now()
        {
            return Ok(entry.status.clone());
        }

        let status = self.fetch_with_retry(external_id).await?;

        self.entries.insert(
            external_id.to_string(),
            CacheEntry {
                status: status.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(status)
    }

    async fn fetch_with_retry(&self, external_id: &str) -> Result<CourierStatus, LookupError> {
        let first = match self.client.fetch_status(external_id).await {
            Ok(status) => return Ok(status),
            Err(e) => e,
        };
        if !first.is_retryable() {
            return Err(first);
        }

        let delay = match &first {
            LookupError::Upstream { retry_after, .. } => retry_after_delay(retry_after.as_deref()),
            LookupError::Transport(_) => DEFAULT_BACKOFF,
        };
        tracing::warn!(
            external_id = %external_id,
            delay_ms = delay.as_millis() as u64,
            "Courier status lookup failed, retrying once"
        );
        tokio::time::sleep(delay).await;

        self.client.fetch_status(external_id).await
    }
}

/// 解析 Retry-After 头：整数秒或 HTTP-date，失败时回退 800ms
fn retry_after_delay(header: Option<&str>) -> Duration {
    let Some(value) = header else {
        return DEFAULT_BACKOFF;
    };

    if let Ok(secs) = value.trim().parse::<u64>() {
        return Duration::from_secs(secs);
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let millis = (date.with_timezone(&chrono::Utc) - chrono::Utc::now()).num_milliseconds();
        if millis > 0 {
            return Duration::from_millis(millis as u64);
        }
    }

    DEFAULT_BACKOFF
}
