use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::logistics::{LogisticsClient, OrderStatusCache};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc/浅拷贝实现低成本 Clone，随请求传递。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 校验服务 |
/// | logistics | LogisticsClient | 外部物流 API 客户端 |
/// | status_cache | Arc<OrderStatusCache> | 快递状态只读缓存 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 校验服务
    pub jwt_service: Arc<JwtService>,
    /// 物流 API 客户端
    pub logistics: LogisticsClient,
    /// 快递状态缓存
    pub status_cache: Arc<OrderStatusCache>,
}

impl ServerState {
    /// 初始化服务器状态 (打开数据库、构建服务)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db = crate::db::init(&config.work_dir).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// 用已打开的数据库构造状态 (测试用内存引擎走这里)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let logistics = LogisticsClient::new(
            config.logistics_api_url.clone(),
            config.logistics_api_token.clone(),
            config.logistics_timeout_ms,
        );
        let status_cache = Arc::new(OrderStatusCache::new(
            logistics.clone(),
            Duration::from_secs(config.status_cache_ttl_secs),
        ));

        Self {
            config,
            db,
            jwt_service,
            logistics,
            status_cache,
        }
    }
}
