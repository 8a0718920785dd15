//! Refresh-token store
//!
//! Refresh tokens are long-lived signed JWTs persisted by value: the token
//! string itself is the primary key of the `refresh_tokens` table. Issuing
//! performs a durable insert; validity checks re-verify the token's own
//! signed payload against the refresh secret. Expired rows are never swept
//! automatically; `revoke` is the only deletion path.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use super::directory::Principal;
use super::token::{issue_token, verify_token, TokenConfig};
use crate::infrastructure::database::entities::refresh_token;

/// Persisted refresh-token records, keyed by the token value
#[derive(Clone)]
pub struct RefreshTokenStore {
    db: DatabaseConnection,
    config: TokenConfig,
}

impl RefreshTokenStore {
    pub fn new(db: DatabaseConnection, config: TokenConfig) -> Self {
        Self { db, config }
    }

    /// Sign a fresh refresh token for the principal and persist the
    /// association. Returns the stored record.
    pub async fn issue(&self, principal: &Principal) -> Result<refresh_token::Model, DbErr> {
        let token = issue_token(principal.email(), &self.config)
            .map_err(|e| DbErr::Custom(format!("refresh token signing failed: {e}")))?;

        let record = refresh_token::ActiveModel {
            token: Set(token),
            principal_email: Set(principal.email().to_string()),
            created_at: Set(Utc::now()),
        };

        record.insert(&self.db).await
    }

    /// Look up a stored refresh token by its value.
    pub async fn find_by_value(&self, token: &str) -> Result<Option<refresh_token::Model>, DbErr> {
        refresh_token::Entity::find_by_id(token).one(&self.db).await
    }

    /// A token is valid iff its embedded subject matches the principal's
    /// email and its signed expiry has not passed.
    pub fn is_valid(&self, token: &str, principal_email: &str) -> bool {
        match verify_token(token, &self.config) {
            Ok(claims) => claims.sub == principal_email,
            Err(_) => false,
        }
    }

    /// Delete a stored refresh token. Unknown tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> Result<(), DbErr> {
        refresh_token::Entity::delete_by_id(token)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
