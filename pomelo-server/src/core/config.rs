use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/pomelo | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | JWT_SECRET | - | 令牌校验密钥 (生产必填) |
/// | LOGISTICS_API_URL | http://localhost:4000 | 外部物流 API 地址 |
/// | LOGISTICS_API_TOKEN | - | 物流 API Bearer 令牌 (可选) |
/// | LOGISTICS_TIMEOUT_MS | 10000 | 物流调用超时 (毫秒) |
/// | STATUS_CACHE_TTL_SECS | 60 | 快递状态缓存 TTL (秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pomelo HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库与日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// JWT 校验配置
    pub jwt: JwtConfig,

    // === 外部物流 API ===
    /// 物流 API 基础地址
    pub logistics_api_url: String,
    /// 物流 API Bearer 令牌
    pub logistics_api_token: Option<String>,
    /// 物流调用超时 (毫秒)
    pub logistics_timeout_ms: u64,
    /// 快递状态缓存 TTL (秒)
    pub status_cache_ttl_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/pomelo".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            jwt: JwtConfig::from_env(),

            logistics_api_url: std::env::var("LOGISTICS_API_URL")
                .unwrap_or_else(|_| "http://localhost:4000".into()),
            logistics_api_token: std::env::var("LOGISTICS_API_TOKEN").ok(),
            logistics_timeout_ms: std::env::var("LOGISTICS_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            status_cache_ttl_secs: std::env::var("STATUS_CACHE_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
        }
    }
}
