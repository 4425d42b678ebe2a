//! 网关共享状态

use std::sync::Arc;

use bgu_auth_core::JwtAuthenticator;
use bgu_rbac::{PermissionResolver, RequestAuthorizer};
use metrics_exporter_prometheus::PrometheusHandle;

/// 网关使用的授权闸门
pub type Gate = RequestAuthorizer<JwtAuthenticator>;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    /// 未安装 recorder 时为 `None`（测试）
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(gate: Gate, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            gate: Arc::new(gate),
            metrics,
        }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        self.gate.resolver()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use bgu_auth_core::{Claims, JwtAuthenticator, TokenService};
    use bgu_common::{EmployeeId, UserId};
    use bgu_rbac::{AccessPolicy, PermissionResolver, RequestAuthorizer, Role, SessionUser};

    use super::AppState;

    const SECRET: &str = "gateway_test_secret_gateway_test_secret";

    pub fn tokens() -> TokenService {
        TokenService::new(SECRET, 3600, "bgu-erp".to_string(), "bgu-erp-api".to_string())
    }

    pub fn state() -> AppState {
        let resolver = PermissionResolver::new(Arc::new(AccessPolicy::builtin().unwrap()));
        AppState::new(
            RequestAuthorizer::new(resolver, JwtAuthenticator::new(tokens())),
            None,
        )
    }

    pub fn user(role: Role) -> SessionUser {
        SessionUser {
            id: UserId::new(),
            email: "staff@bgu.example".to_string(),
            role,
            employee_id: Some(EmployeeId::new("EMP-42")),
        }
    }

    pub fn token(role: Role) -> String {
        tokens().generate_access_token(&user(role)).unwrap()
    }

    pub fn deactivated_token(role: Role) -> String {
        let mut claims = Claims::new(&user(role), 3600, "bgu-erp", "bgu-erp-api");
        claims.active = false;
        tokens().encode_claims(&claims).unwrap()
    }
}
