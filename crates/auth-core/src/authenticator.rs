//! 基于 JWT 的认证协作方

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bgu_rbac::{AuthenticationError, Authenticator, Credential, SessionUser};

use crate::TokenService;

/// 令牌吊销查询
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn is_revoked(&self, jti: &str) -> bool;
}

/// 进程内吊销表
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashSet<String>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: impl Into<String>) {
        if let Ok(mut revoked) = self.revoked.write() {
            revoked.insert(jti.into());
        }
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn is_revoked(&self, jti: &str) -> bool {
        // 锁中毒时按已吊销处理
        self.revoked
            .read()
            .map(|revoked| revoked.contains(jti))
            .unwrap_or(true)
    }
}

/// JWT 认证器
#[derive(Clone)]
pub struct JwtAuthenticator {
    tokens: TokenService,
    revocations: Option<Arc<dyn RevocationStore>>,
}

impl JwtAuthenticator {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens,
            revocations: None,
        }
    }

    pub fn with_revocations(mut self, store: Arc<dyn RevocationStore>) -> Self {
        self.revocations = Some(store);
        self
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, credential: &Credential) -> Result<SessionUser, AuthenticationError> {
        let claims = self.tokens.validate_access_token(credential.expose())?;

        if let Some(store) = &self.revocations {
            if store.is_revoked(&claims.jti).await {
                tracing::debug!(jti = %claims.jti, "Rejected revoked token");
                return Err(AuthenticationError::Revoked);
            }
        }

        let user = claims.session_user()?;
        if !claims.active {
            tracing::debug!(user_id = %user.id, "Rejected token of deactivated account");
            return Err(AuthenticationError::Deactivated);
        }

        Ok(user)
    }
}
