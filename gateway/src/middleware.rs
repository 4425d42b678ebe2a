//! 中间件

use std::time::Instant;

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bgu_rbac::{AuthorizationDecision, Module, SessionUser};
use bgu_telemetry::{AUTHORIZATION_DECISION_DURATION_MS, AUTHORIZATION_DECISIONS_TOTAL};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// 拒绝响应：`{ "error": msg }` + 401/403
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRejection {
    pub status: StatusCode,
    pub message: String,
}

impl GateRejection {
    /// 放行决策返回 `None`
    pub fn from_decision(decision: &AuthorizationDecision) -> Option<Self> {
        let message = decision.error()?;
        Some(Self {
            status: StatusCode::from_u16(decision.status()).unwrap_or(StatusCode::FORBIDDEN),
            message: message.to_string(),
        })
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// 闸门检查范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateScope<'a> {
    /// 仅认证
    Session,
    /// 认证并检查模块权限
    Module(&'a str),
    /// 请求信息不完整（如转发头缺失）：认证通过后仍拒绝
    Incomplete,
}

/// 请求信息不完整时的拒绝原因
pub const INCOMPLETE_REQUEST_MESSAGE: &str = "Forwarded request method or URI is missing";

/// 指标标签：未知模块折叠为 "unknown"，避免标签基数失控
fn module_label(scope: GateScope<'_>) -> &'static str {
    match scope {
        GateScope::Session => "none",
        GateScope::Incomplete => "incomplete",
        GateScope::Module(key) => Module::from_key(key).map_or("unknown", |m| m.as_str()),
    }
}

/// 调用闸门并记录日志与指标
pub async fn run_gate(
    state: &AppState,
    headers: &HeaderMap,
    scope: GateScope<'_>,
    verb: &str,
) -> AuthorizationDecision {
    let started = Instant::now();

    let decision = match scope {
        GateScope::Module(module) => {
            state
                .gate
                .authenticate_and_authorize_verb(headers, module, verb)
                .await
        }
        GateScope::Session => state.gate.authenticate(headers).await,
        GateScope::Incomplete => match state.gate.authenticate(headers).await {
            AuthorizationDecision::Authorized(_) => {
                AuthorizationDecision::Forbidden(INCOMPLETE_REQUEST_MESSAGE.to_string())
            }
            denied => denied,
        },
    };

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let label = module_label(scope);
    metrics::counter!(
        AUTHORIZATION_DECISIONS_TOTAL,
        "module" => label,
        "status" => decision.status().to_string()
    )
    .increment(1);
    metrics::histogram!(AUTHORIZATION_DECISION_DURATION_MS).record(elapsed_ms);

    match &decision {
        AuthorizationDecision::Authorized(user) => debug!(
            user_id = %user.id,
            role = %user.role,
            module = label,
            verb,
            "Request authorized"
        ),
        AuthorizationDecision::Unauthenticated => {
            info!(module = label, verb, "Request rejected: unauthenticated")
        }
        AuthorizationDecision::Forbidden(reason) => {
            warn!(module = label, verb, reason = %reason, "Request rejected: forbidden")
        }
    }

    decision
}

/// 已授权用户提取器
///
/// 应在 `require_session` / `require_module` 之后使用
pub struct AuthorizedUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthorizedUser)
            .ok_or_else(|| GateRejection {
                status: StatusCode::UNAUTHORIZED,
                message: bgu_rbac::presenter::UNAUTHORIZED_MESSAGE.to_string(),
            })
    }
}

async fn admit(decision: AuthorizationDecision, mut request: Request, next: Next) -> Response {
    match decision {
        AuthorizationDecision::Authorized(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        denied => match GateRejection::from_decision(&denied) {
            Some(rejection) => rejection.into_response(),
            None => StatusCode::FORBIDDEN.into_response(),
        },
    }
}

/// 仅要求已认证会话
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let decision = run_gate(
        &state,
        request.headers(),
        GateScope::Session,
        request.method().as_str(),
    )
    .await;
    admit(decision, request, next).await
}

/// 模块守卫状态
#[derive(Clone)]
pub struct ModuleGuard {
    pub state: AppState,
    pub module: &'static str,
}

impl ModuleGuard {
    pub fn new(state: AppState, module: Module) -> Self {
        Self {
            state,
            module: module.as_str(),
        }
    }
}

/// 要求对指定模块具备与请求动词对应的操作权限
///
/// 用法：`middleware::from_fn_with_state(ModuleGuard::new(state, Module::Finance), require_module)`
pub async fn require_module(
    State(guard): State<ModuleGuard>,
    request: Request,
    next: Next,
) -> Response {
    let method: Method = request.method().clone();
    let decision = run_gate(
        &guard.state,
        request.headers(),
        GateScope::Module(guard.module),
        method.as_str(),
    )
    .await;
    admit(decision, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{deactivated_token, state, token};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
        middleware,
        routing::get,
    };
    use bgu_rbac::Role;
    use tower::ServiceExt;

    async fn whoami(AuthorizedUser(user): AuthorizedUser) -> String {
        user.role.to_string()
    }

    fn finance_app() -> Router {
        let guard = ModuleGuard::new(state(), Module::Finance);
        Router::new()
            .route("/", get(whoami).post(whoami).head(whoami))
            .layer(middleware::from_fn_with_state(guard, require_module))
    }

    fn request(method: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn error_of(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_full_access_passes_user_through() {
        let token = token(Role::FinanceTeam);
        let response = finance_app()
            .oneshot(request("POST", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"FINANCE_TEAM");
    }

    #[tokio::test]
    async fn test_read_only_cannot_create() {
        let token = token(Role::ProcurementBd);
        let ok = finance_app()
            .oneshot(request("GET", Some(&token)))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let denied = finance_app()
            .oneshot(request("POST", Some(&token)))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        assert!(error_of(denied).await.contains("permission"));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = finance_app().oneshot(request("GET", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn test_unmapped_verb_is_forbidden() {
        let token = token(Role::Management);
        let response = finance_app()
            .oneshot(request("HEAD", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_deactivated_account_is_forbidden() {
        let token = deactivated_token(Role::Management);
        let response = finance_app()
            .oneshot(request("GET", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_of(response).await, "Account is deactivated");
    }

    #[test]
    fn test_module_label_folds_unknown_keys() {
        assert_eq!(module_label(GateScope::Module("finance")), "finance");
        assert_eq!(module_label(GateScope::Module("Finance")), "unknown");
        assert_eq!(module_label(GateScope::Session), "none");
        assert_eq!(module_label(GateScope::Incomplete), "incomplete");
    }
}
