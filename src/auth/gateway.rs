//! Authentication gateway
//!
//! Orchestrates the two credential flows: login (password check → access
//! token + persisted refresh token) and refresh (stored-token validation →
//! new access token), plus explicit refresh-token revocation on logout.
//!
//! Failure semantics are deliberately coarse. A caller never learns whether
//! the email or the password was wrong, and internal errors during refresh
//! are downgraded to [`AuthError::ProcessingError`] with no detail attached.

use thiserror::Error;
use tracing::{debug, warn};

use super::directory::PrincipalDirectory;
use super::password::verify_password;
use super::refresh::RefreshTokenStore;
use super::token::{issue_token, TokenConfig};

/// Authentication failure taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or banned account
    #[error("Invalid credentials")]
    BadCredentials,
    /// Refresh token absent from the request
    #[error("Refresh token is missing")]
    MissingToken,
    /// Refresh token unknown, expired, or bound to another principal
    #[error("Refresh token is invalid")]
    InvalidToken,
    /// Internal error, detail withheld from the caller
    #[error("Error while processing the request")]
    ProcessingError,
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login / refresh / logout orchestration
#[derive(Clone)]
pub struct AuthGateway {
    directory: PrincipalDirectory,
    refresh_store: RefreshTokenStore,
    access_config: TokenConfig,
}

impl AuthGateway {
    pub fn new(
        directory: PrincipalDirectory,
        refresh_store: RefreshTokenStore,
        access_config: TokenConfig,
    ) -> Self {
        Self {
            directory,
            refresh_store,
            access_config,
        }
    }

    /// Authenticate a principal and issue both tokens.
    ///
    /// The plaintext password and the issued tokens are never logged.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let principal = self
            .directory
            .find_by_email(email)
            .await
            .map_err(|_| AuthError::ProcessingError)?
            .ok_or(AuthError::BadCredentials)?;

        if !verify_password(password, principal.password_hash()) {
            warn!(email, "login rejected: bad credentials");
            return Err(AuthError::BadCredentials);
        }

        // Banned accounts keep their credentials but must not authenticate.
        if principal.is_banned() {
            warn!(email, "login rejected: account is banned");
            return Err(AuthError::BadCredentials);
        }

        let access_token = issue_token(principal.email(), &self.access_config)
            .map_err(|_| AuthError::ProcessingError)?;

        let refresh = self
            .refresh_store
            .issue(&principal)
            .await
            .map_err(|_| AuthError::ProcessingError)?;

        debug!(email, "login succeeded");
        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
        })
    }

    /// Exchange a stored refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated: the same long-lived token is
    /// reused across refreshes until it expires or is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let record = self
            .refresh_store
            .find_by_value(refresh_token)
            .await
            .map_err(|_| AuthError::ProcessingError)?
            .ok_or(AuthError::InvalidToken)?;

        let principal = self
            .directory
            .find_by_email(&record.principal_email)
            .await
            .map_err(|_| AuthError::ProcessingError)?
            .ok_or(AuthError::InvalidToken)?;

        if !self.refresh_store.is_valid(refresh_token, principal.email()) {
            return Err(AuthError::InvalidToken);
        }

        issue_token(principal.email(), &self.access_config).map_err(|_| AuthError::ProcessingError)
    }

    /// Revoke a refresh token. Unknown tokens succeed silently; possession
    /// of the token value is the only authorization required.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        self.refresh_store
            .revoke(refresh_token)
            .await
            .map_err(|_| AuthError::ProcessingError)
    }
}
