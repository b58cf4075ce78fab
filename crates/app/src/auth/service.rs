//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;

use crate::auth::{
    AdminPrincipal, AdminTokenRecord, AdminTokenUuid, AuthServiceError, IssuedAdminToken,
    generate_admin_token, hash_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new admin token.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the database insertion fails.
    pub async fn issue_admin_token(&self, name: &str) -> Result<IssuedAdminToken, AuthServiceError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(AuthServiceError::MissingRequiredData);
        }

        let token = generate_admin_token();

        let metadata = self
            .repository
            .create_admin_token(AdminTokenUuid::new(), name, &hash_token(&token))
            .await?;

        Ok(IssuedAdminToken { token, metadata })
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_admin_token(&self, token: AdminTokenUuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_admin_token(token)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }

    /// List all admin tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_admin_tokens(&self) -> Result<Vec<AdminTokenRecord>, AuthServiceError> {
        self.repository
            .list_admin_tokens()
            .await
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AdminPrincipal, AuthServiceError> {
        let token = self
            .repository
            .find_active_admin_token_by_hash(&hash_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(err) = self.repository.touch_admin_token(token.uuid).await {
            warn!(token = %token.uuid, error = %err, "failed to record token use");
        }

        Ok(AdminPrincipal {
            token: token.uuid,
            name: token.name,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the admin it was issued to.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AdminPrincipal, AuthServiceError>;
}
