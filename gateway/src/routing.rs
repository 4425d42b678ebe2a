//! API 路由

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use bgu_rbac::{AccessIndicator, AccessLevel, Module, NavigationResult, Role, SessionUser};
use bgu_telemetry::HealthStatus;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::authz::forward_auth;
use crate::middleware::{AuthorizedUser, ModuleGuard, require_module, require_session};
use crate::state::AppState;

/// 完整的网关路由
pub fn app(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/api/me", get(current_user))
        .route("/api/navigation", get(validate_navigation))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    let admin_routes = Router::new()
        .route("/api/policy", get(policy_matrix))
        .layer(middleware::from_fn_with_state(
            ModuleGuard::new(state.clone(), Module::Administration),
            require_module,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(render_metrics))
        .route("/authz", any(forward_auth))
        .merge(session_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn readiness_check(State(state): State<AppState>) -> Response {
    let mut status = HealthStatus::new();
    let policy = state.resolver().policy();
    status.add_check(
        "access_policy",
        !policy.is_empty(),
        Some(format!("{} entries", policy.len())),
    );
    status.add_check("metrics_recorder", state.metrics.is_some(), None);

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct ModuleAccess {
    pub module: Module,
    pub access: AccessLevel,
    pub indicator: AccessIndicator,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: SessionUser,
    pub role_description: &'static str,
    pub accessible_modules: Vec<Module>,
    pub permissions: Vec<ModuleAccess>,
}

/// `GET /api/me`：会话用户及其各模块访问级别
async fn current_user(
    State(state): State<AppState>,
    AuthorizedUser(user): AuthorizedUser,
) -> Json<MeResponse> {
    let resolver = state.resolver();
    let role = user.role;

    let permissions = Module::ALL
        .into_iter()
        .map(|module| {
            let access = resolver.policy().lookup(role, module).access;
            ModuleAccess {
                module,
                access,
                indicator: AccessIndicator::for_level(access),
            }
        })
        .collect();

    Json(MeResponse {
        role_description: role.description(),
        accessible_modules: resolver.get_accessible_modules(role),
        permissions,
        user,
    })
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    #[serde(default)]
    pub path: String,
}

/// `GET /api/navigation?path=`
async fn validate_navigation(
    State(state): State<AppState>,
    AuthorizedUser(user): AuthorizedUser,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResult> {
    Json(state.resolver().validate_navigation(user.role, &query.path))
}

#[derive(Debug, Serialize)]
pub struct PolicyRow {
    pub role: Role,
    pub description: &'static str,
    pub modules: BTreeMap<&'static str, AccessLevel>,
}

/// `GET /api/policy`：完整能力矩阵（需 administration 权限）
async fn policy_matrix(State(state): State<AppState>) -> Json<Vec<PolicyRow>> {
    let policy = state.resolver().policy();
    let rows = Role::ALL
        .into_iter()
        .map(|role| PolicyRow {
            role,
            description: role.description(),
            modules: Module::ALL
                .into_iter()
                .map(|m| (m.as_str(), policy.lookup(role, m).access))
                .collect(),
        })
        .collect();
    Json(rows)
}
