//! JWT 令牌服务
//!
//! 校验外部身份服务签发的令牌并解出调用者身份。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
    /// 令牌过期时间 (分钟)，仅本地签发工具/测试使用
    pub expiration_minutes: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET not set, using development key");
                    "development-only-key-must-be-replaced".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("🚨 FATAL: JWT_SECRET must be set in production");
                }
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pomelo-identity".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "pomelo-server".to_string()),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
        }
    }
}

/// 调用者角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::Customer => "customer",
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 角色
    pub role: Role,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// 当前调用者上下文
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,
}

// =============================================================================
// JWT Service
// =============================================================================

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// 从 Authorization 头里取出 Bearer 令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 校验并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// 签发令牌。正式环境由身份服务负责，这里供本地工具与测试使用
    pub fn generate_token(&self, user_id: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "unit-test-secret-at-least-32-bytes!!".to_string(),
            issuer: "pomelo-identity".to_string(),
            audience: "pomelo-server".to_string(),
            expiration_minutes: 5,
        })
    }

    #[test]
    fn roundtrip_preserves_identity_and_role() {
        let service = test_service();
        let token = service.generate_token("u-42", Role::Moderator).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u-42");
        assert_eq!(claims.role, Role::Moderator);
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let service = test_service();
        let other = JwtService::new(JwtConfig {
            secret: "unit-test-secret-at-least-32-bytes!!".to_string(),
            issuer: "pomelo-identity".to_string(),
            audience: "someone-else".to_string(),
            expiration_minutes: 5,
        });
        let token = other.generate_token("u-42", Role::Admin).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
