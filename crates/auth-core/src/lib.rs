//! bgu-auth-core - 认证核心库
//!
//! JWT Claims / 令牌校验，以及基于 JWT 的认证协作方实现

mod authenticator;

pub use authenticator::{InMemoryRevocationStore, JwtAuthenticator, RevocationStore};

use bgu_common::{EmployeeId, UserId};
use bgu_errors::{AppError, AppResult};
use bgu_rbac::{AuthenticationError, Role, SessionUser};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 访问令牌类型标记
pub const ACCESS_TOKEN_TYPE: &str = "access";

fn default_active() -> bool {
    true
}

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// 角色键，如 "FINANCE_TEAM"
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// 账号是否启用
    #[serde(default = "default_active")]
    pub active: bool,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    pub fn new(user: &SessionUser, expires_in_secs: i64, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            employee_id: user.employee_id.as_ref().map(|e| e.as_str().to_string()),
            active: true,
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == ACCESS_TOKEN_TYPE
    }

    /// 转换为会话用户；角色或用户 ID 无法识别时视为无效凭证
    pub fn session_user(&self) -> Result<SessionUser, AuthenticationError> {
        let id = UserId::from_string(&self.sub)
            .map_err(|_| AuthenticationError::Invalid("invalid user ID in token".to_string()))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|_| AuthenticationError::Invalid(format!("unknown role in token: {}", self.role)))?;

        Ok(SessionUser {
            id,
            email: self.email.clone(),
            role,
            employee_id: self.employee_id.clone().map(EmployeeId::new),
        })
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(secret: &str, access_token_expires_in: i64, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            issuer,
            audience,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, user: &SessionUser) -> AppResult<String> {
        let claims = Claims::new(user, self.access_token_expires_in, &self.issuer, &self.audience);
        self.encode_claims(&claims)
    }

    /// 按给定 Claims 签发（测试与停用账号场景使用）
    pub fn encode_claims(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证访问令牌
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthenticationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0; // 不允许时间偏差

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthenticationError::Expired,
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    AuthenticationError::MalformedCredential
                }
                _ => AuthenticationError::Invalid(e.to_string()),
            })?
            .claims;

        if !claims.is_access_token() {
            return Err(AuthenticationError::Invalid("not an access token".to_string()));
        }
        if claims.jti.is_empty() {
            return Err(AuthenticationError::Invalid("token ID (jti) missing".to_string()));
        }

        Ok(claims)
    }

    /// 获取访问令牌过期时间（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}
