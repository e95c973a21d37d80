//! 工具模块 - 错误类型与日志
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResponse`] - API 统一响应结构
//! - [`logger`] - tracing 初始化

pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
