//! 认证授权模块
//!
//! 身份签发在外部身份服务完成，这里只做 Bearer JWT 的本地校验与角色检查：
//! - [`JwtService`] - JWT 令牌校验
//! - [`CurrentUser`] - 当前调用者 (id + 角色)
//! - [`Role`] - admin | moderator | customer

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};

use crate::utils::{AppError, AppResult};

/// 仅 admin 可执行的操作 (创建/删除/库存调整)
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin role required".to_string()))
    }
}

/// admin 或 moderator 可执行的操作 (状态流转、各类查询)
pub fn require_staff(user: &CurrentUser) -> AppResult<()> {
    match user.role {
        Role::Admin | Role::Moderator => Ok(()),
        Role::Customer => Err(AppError::Forbidden(
            "admin or moderator role required".to_string(),
        )),
    }
}
