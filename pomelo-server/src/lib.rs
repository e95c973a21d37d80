//! Pomelo Server - 零售订单管理后端
//!
//! 负责订单生命周期与库存对账：
//!
//! - **状态机** (`orders`): 订单状态流转，delivered 边界维护销量计数与收入结算
//! - **库存台账** (`inventory`): 按 variant/尺码定位的可用库存，原子增减
//! - **物流对接** (`logistics`): 托运单收入结算、快递状态只读缓存
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT 校验与角色检查 (签发方为外部身份服务)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pomelo-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 校验、角色
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (repository)
//! ├── inventory/     # 库存台账
//! ├── orders/        # 状态机、删除工作流
//! ├── logistics/     # 外部物流 API 客户端与缓存
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod logistics;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use inventory::{InventoryLedger, StockAdjustment};
pub use orders::{OrderDeletionWorkflow, StatusTransitionEngine};
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger;
