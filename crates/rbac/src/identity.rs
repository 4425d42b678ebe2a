//! 身份与认证协作方
//!
//! 凭证的签发与校验不在本库范围内，这里只定义协作接口，
//! 具体实现（JWT 等）由外部 crate 提供。

use async_trait::async_trait;
use bgu_common::{EmployeeId, UserId};
use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::role::Role;

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "bgu_session";

/// 已认证的会话用户
///
/// 每个请求由认证协作方生成一次，请求期间不可变，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
}

/// 认证失败原因
///
/// 对外统一表现为 401 "Unauthorized"（`Deactivated` 除外）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    #[error("credential missing")]
    MissingCredential,

    #[error("credential malformed")]
    MalformedCredential,

    #[error("credential expired")]
    Expired,

    #[error("credential revoked")]
    Revoked,

    #[error("credential invalid: {0}")]
    Invalid(String),

    #[error("authentication timed out")]
    TimedOut,

    /// 身份有效但账号已停用
    #[error("account deactivated")]
    Deactivated,
}

/// 不透明的请求凭证（Bearer token 或会话 Cookie）
#[derive(Debug)]
pub struct Credential(Secret<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// 从请求头提取凭证
    ///
    /// 优先 `Authorization: Bearer <token>`，其次 `bgu_session` Cookie。
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthenticationError> {
        if let Some(value) = headers.get(AUTHORIZATION) {
            let value = value
                .to_str()
                .map_err(|_| AuthenticationError::MalformedCredential)?;
            // 认证方案名不区分大小写（RFC 7235）
            let token = value
                .trim()
                .split_once(' ')
                .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
                .map(|(_, token)| token.trim())
                .filter(|t| !t.is_empty())
                .ok_or(AuthenticationError::MalformedCredential)?;
            return Ok(Self::new(token));
        }

        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            let token = value
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(name, _)| *name == SESSION_COOKIE)
                .map(|(_, token)| token.trim());
            match token {
                Some(token) if !token.is_empty() => return Ok(Self::new(token)),
                Some(_) => return Err(AuthenticationError::MalformedCredential),
                None => {}
            }
        }

        Err(AuthenticationError::MissingCredential)
    }
}

/// 外部认证协作方
///
/// 负责签名、过期与吊销校验；重试（如有）也由实现方负责。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credential: &Credential) -> Result<SessionUser, AuthenticationError>;
}
