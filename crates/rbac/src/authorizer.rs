//! 请求授权闸门
//!
//! 每个受保护接口在产生任何副作用之前调用。状态流转只有一跳：
//! 未认证 → 已认证 → {已授权 | 禁止}。
//!
//! 任何异常或歧义（未知模块、无法映射的动词、认证超时）都落到拒绝，
//! 绝不默认放行。

use std::time::Duration;

use bgu_errors::{AppError, AppResult};
use http::{HeaderMap, Method};
use serde::{Serialize, Serializer};

use crate::identity::{AuthenticationError, Authenticator, Credential, SessionUser};
use crate::permission::Action;
use crate::presenter::{self, DEACTIVATED_MESSAGE, UNAUTHORIZED_MESSAGE};
use crate::resolver::PermissionResolver;

/// 认证协作方默认超时
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP 动词 → CRUD 操作
///
/// 全局唯一的映射点；GET/POST/PUT/PATCH/DELETE 以外的动词返回 `None`。
pub fn action_for_method(method: &Method) -> Option<Action> {
    match method.as_str() {
        "GET" => Some(Action::Read),
        "POST" => Some(Action::Create),
        "PUT" | "PATCH" => Some(Action::Update),
        "DELETE" => Some(Action::Delete),
        _ => None,
    }
}

/// 授权决策
///
/// 每次调用新建，不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// 200：放行，携带会话用户
    Authorized(SessionUser),
    /// 401：凭证缺失、无效、过期、吊销或认证超时
    Unauthenticated,
    /// 403：身份已确认但无权执行
    Forbidden(String),
}

impl AuthorizationDecision {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Authorized(_) => 200,
            Self::Unauthenticated => 401,
            Self::Forbidden(_) => 403,
        }
    }

    /// 拒绝原因（放行时为 `None`）
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Authorized(_) => None,
            Self::Unauthenticated => Some(UNAUTHORIZED_MESSAGE),
            Self::Forbidden(message) => Some(message),
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authorized(user) => Some(user),
            _ => None,
        }
    }

    pub fn into_result(self) -> AppResult<SessionUser> {
        match self {
            Self::Authorized(user) => Ok(user),
            Self::Unauthenticated => Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE)),
            Self::Forbidden(message) => Err(AppError::forbidden(message)),
        }
    }
}

#[derive(Serialize)]
struct DecisionBody<'a> {
    success: bool,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a SessionUser>,
}

impl Serialize for AuthorizationDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DecisionBody {
            success: self.is_success(),
            status: self.status(),
            error: self.error(),
            user: self.user(),
        }
        .serialize(serializer)
    }
}

/// 请求授权器
///
/// 除只读的认证调用外没有副作用，同一请求内可重复调用。
pub struct RequestAuthorizer<A> {
    resolver: PermissionResolver,
    authenticator: A,
    auth_timeout: Duration,
}

impl<A> RequestAuthorizer<A>
where
    A: Authenticator,
{
    pub fn new(resolver: PermissionResolver, authenticator: A) -> Self {
        Self {
            resolver,
            authenticator,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
        }
    }

    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// 仅认证，不做模块权限检查
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthorizationDecision {
        match self.identify(headers).await {
            Ok(user) => AuthorizationDecision::Authorized(user),
            Err(AuthenticationError::Deactivated) => {
                AuthorizationDecision::Forbidden(DEACTIVATED_MESSAGE.to_string())
            }
            Err(_) => AuthorizationDecision::Unauthenticated,
        }
    }

    /// 认证并授权
    ///
    /// 认证失败直接返回 401，不会进入权限查询。
    pub async fn authenticate_and_authorize(
        &self,
        headers: &HeaderMap,
        module: &str,
        method: &Method,
    ) -> AuthorizationDecision {
        match self.authenticate(headers).await {
            AuthorizationDecision::Authorized(user) => self.authorize(user, module, method),
            denied => denied,
        }
    }

    /// 以字符串动词调用；动词区分大小写，无法解析时拒绝
    pub async fn authenticate_and_authorize_verb(
        &self,
        headers: &HeaderMap,
        module: &str,
        verb: &str,
    ) -> AuthorizationDecision {
        match self.authenticate(headers).await {
            AuthorizationDecision::Authorized(user) => match Method::from_bytes(verb.as_bytes()) {
                Ok(method) => self.authorize(user, module, &method),
                Err(_) => AuthorizationDecision::Forbidden(presenter::permission_denied_message(
                    verb, module,
                )),
            },
            denied => denied,
        }
    }

    /// 对已认证用户做权限判定（纯函数）
    pub fn authorize(&self, user: SessionUser, module: &str, method: &Method) -> AuthorizationDecision {
        let Some(action) = action_for_method(method) else {
            return AuthorizationDecision::Forbidden(presenter::permission_denied_message(
                method.as_str(),
                module,
            ));
        };

        match self.resolver.check_permission(user.role, module, action) {
            Ok(check) if check.allowed => AuthorizationDecision::Authorized(user),
            Ok(check) => AuthorizationDecision::Forbidden(check.message),
            Err(_) => {
                AuthorizationDecision::Forbidden(presenter::permission_denied_message(action, module))
            }
        }
    }

    async fn identify(&self, headers: &HeaderMap) -> Result<SessionUser, AuthenticationError> {
        let credential = Credential::from_headers(headers)?;
        tokio::time::timeout(self.auth_timeout, self.authenticator.authenticate(&credential))
            .await
            .unwrap_or(Err(AuthenticationError::TimedOut))
    }
}
