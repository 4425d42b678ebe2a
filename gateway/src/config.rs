//! Gateway 配置装配

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bgu_auth_core::{JwtAuthenticator, TokenService};
use bgu_config::{AppConfig, RbacConfig};
use bgu_rbac::{AccessPolicy, ActionSet, PermissionResolver, RbacResult, RequestAuthorizer};
use secrecy::ExposeSecret;
use tracing::info;

use crate::state::Gate;

/// 内置矩阵 + 配置覆盖，构建后校验
pub fn build_policy(rbac: &RbacConfig) -> RbacResult<AccessPolicy> {
    let mut builder = AccessPolicy::builder().with_builtin_matrix();

    for o in &rbac.overrides {
        let actions = o.actions.map(|a| ActionSet {
            create: a.create,
            read: a.read,
            update: a.update,
            delete: a.delete,
        });
        builder = builder.override_entry(&o.role, &o.module, &o.access, actions)?;
        info!(role = %o.role, module = %o.module, access = %o.access, "Applied policy override");
    }

    builder.build()
}

/// 构建授权闸门
pub fn build_gate(config: &AppConfig) -> anyhow::Result<Gate> {
    let policy = build_policy(&config.rbac).context("Invalid access policy")?;
    info!(entries = policy.len(), "Access policy loaded");

    let tokens = TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    );

    Ok(RequestAuthorizer::new(
        PermissionResolver::new(Arc::new(policy)),
        JwtAuthenticator::new(tokens),
    )
    .with_auth_timeout(Duration::from_millis(config.rbac.auth_timeout_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgu_config::{ActionsOverride, PolicyOverride};
    use bgu_rbac::{AccessLevel, Module, RbacError, Role};

    fn rbac(overrides: Vec<PolicyOverride>) -> RbacConfig {
        RbacConfig {
            overrides,
            ..RbacConfig::default()
        }
    }

    fn entry(role: &str, module: &str, access: &str) -> PolicyOverride {
        PolicyOverride {
            role: role.to_string(),
            module: module.to_string(),
            access: access.to_string(),
            actions: None,
        }
    }

    #[test]
    fn test_no_overrides_is_builtin() {
        let policy = build_policy(&RbacConfig::default()).unwrap();
        assert_eq!(
            policy.lookup(Role::ImsQhse, Module::Qhse).access,
            AccessLevel::Full
        );
        assert_eq!(policy.len(), AccessPolicy::builtin().unwrap().len());
    }

    #[test]
    fn test_override_applied() {
        let policy = build_policy(&rbac(vec![entry("IMS_QHSE", "sales", "READ")])).unwrap();
        assert_eq!(
            policy.lookup(Role::ImsQhse, Module::Sales).access,
            AccessLevel::Read
        );
    }

    #[test]
    fn test_unknown_module_override_rejected() {
        let err = build_policy(&rbac(vec![entry("IMS_QHSE", "hr", "READ")])).unwrap_err();
        assert!(matches!(err, RbacError::UnknownModule { .. }));
    }

    #[test]
    fn test_superuser_downgrade_rejected() {
        let err = build_policy(&rbac(vec![entry("MANAGEMENT", "finance", "READ")])).unwrap_err();
        assert!(matches!(err, RbacError::SuperuserIncomplete { .. }));
    }

    #[test]
    fn test_inconsistent_actions_rejected() {
        let mut o = entry("ADMIN_HR", "sales", "READ");
        o.actions = Some(ActionsOverride {
            create: true,
            read: true,
            update: false,
            delete: false,
        });
        let err = build_policy(&rbac(vec![o])).unwrap_err();
        assert!(matches!(err, RbacError::InvalidEntry { .. }));
    }
}
