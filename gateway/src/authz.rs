//! 转发认证（forward-auth）
//!
//! 反向代理把原始请求的动词与路径放在 `X-Forwarded-Method` / `X-Forwarded-Uri`
//! 中转发过来；放行时回传 `X-User-*` 头，拒绝时返回 401/403。
//! 任一转发头缺失或无法解码时，认证通过也一律拒绝。

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use bgu_rbac::{AuthorizationDecision, SessionUser};

use crate::middleware::{GateRejection, GateScope, run_gate};
use crate::state::AppState;

pub const X_FORWARDED_METHOD: &str = "x-forwarded-method";
pub const X_FORWARDED_URI: &str = "x-forwarded-uri";

pub const X_USER_ID: &str = "x-user-id";
pub const X_USER_EMAIL: &str = "x-user-email";
pub const X_USER_ROLE: &str = "x-user-role";
pub const X_USER_EMPLOYEE_ID: &str = "x-user-employee-id";

/// 从原始路径解析模块键
///
/// 去掉查询串与可选的 `api` 前缀后取第一段；根路径返回 `None`。
pub fn module_from_uri(uri: &str) -> Option<&str> {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match segments.next()? {
        "api" => segments.next(),
        first => Some(first),
    }
}

fn forwarded<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn user_headers(user: &SessionUser) -> Vec<(HeaderName, HeaderValue)> {
    let mut pairs = vec![
        (X_USER_ID, user.id.to_string()),
        (X_USER_EMAIL, user.email.clone()),
        (X_USER_ROLE, user.role.as_str().to_string()),
    ];
    if let Some(employee_id) = &user.employee_id {
        pairs.push((X_USER_EMPLOYEE_ID, employee_id.as_str().to_string()));
    }

    // 无法编码为头部值的字段直接跳过
    pairs
        .into_iter()
        .filter_map(|(name, value)| {
            HeaderValue::from_str(&value)
                .ok()
                .map(|v| (HeaderName::from_static(name), v))
        })
        .collect()
}

/// `ANY /authz`
pub async fn forward_auth(State(state): State<AppState>, method: Method, headers: HeaderMap) -> Response {
    let forwarded_method = forwarded(&headers, X_FORWARDED_METHOD);
    let forwarded_uri = forwarded(&headers, X_FORWARDED_URI);

    let decision = match (forwarded_method, forwarded_uri) {
        (Some(verb), Some(uri)) => {
            let scope = module_from_uri(uri).map_or(GateScope::Session, GateScope::Module);
            run_gate(&state, &headers, scope, verb).await
        }
        _ => run_gate(&state, &headers, GateScope::Incomplete, method.as_str()).await,
    };

    match decision {
        AuthorizationDecision::Authorized(user) => {
            let mut response = StatusCode::OK.into_response();
            response.headers_mut().extend(user_headers(&user));
            response
        }
        denied => match GateRejection::from_decision(&denied) {
            Some(rejection) => rejection.into_response(),
            None => StatusCode::FORBIDDEN.into_response(),
        },
    }
}
