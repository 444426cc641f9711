//! Authentication service.
//!
//! Registration, password login, opaque bearer tokens, and the cached user
//! lookup the middleware resolves principals through. Tokens are random
//! bytes bound to a username in the cache layer's `sessions` namespace;
//! their format carries no meaning.

use std::collections::BTreeSet;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use loanbook_core::{Email, Role};

use crate::cache::CacheLayer;
use crate::models::{NewUser, Principal, UserView};
use crate::store::{DuplicateField, UserStore};

use super::ServiceError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes per issued token.
const TOKEN_BYTES: usize = 32;

/// Successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub email: Email,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a UserStore,
    cache: &'a CacheLayer,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(users: &'a UserStore, cache: &'a CacheLayer) -> Self {
        Self { users, cache }
    }

    /// Register a new account and issue a token for it.
    ///
    /// Roles default to `USER` when none are named. Registration evicts the
    /// `users` namespace; a new account changes who a cached lookup may
    /// resolve.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed email or short password and
    /// `DuplicateIdentity` when the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
        roles: &[Role],
    ) -> Result<AuthResponse, ServiceError> {
        let email = Email::parse(email)
            .map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let roles: BTreeSet<Role> = if roles.is_empty() {
            BTreeSet::from([Role::User])
        } else {
            roles.iter().copied().collect()
        };

        let user = self
            .users
            .insert(NewUser {
                username: username.to_owned(),
                email,
                password_hash,
                full_name: full_name.to_owned(),
                roles,
                enabled: true,
            })
            .await
            .map_err(|field| match field {
                DuplicateField::Username => {
                    ServiceError::DuplicateIdentity("username is already taken".to_owned())
                }
                DuplicateField::Email => {
                    ServiceError::DuplicateIdentity("email is already registered".to_owned())
                }
            })?;

        self.cache.evict_users();
        let token = self.issue_token(&user.username).await;
        info!(username = %user.username, "account registered");

        Ok(AuthResponse {
            token,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            roles: user.roles,
        })
    }

    /// Login with email and password, issuing a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on unknown email or wrong password, and
    /// `Forbidden` for a disabled account.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .ok_or(ServiceError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        if !user.enabled {
            warn!(username = %user.username, "login refused for disabled account");
            return Err(ServiceError::Forbidden("account is disabled".to_owned()));
        }

        let token = self.issue_token(&user.username).await;
        info!(username = %user.username, "login");

        Ok(AuthResponse {
            token,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            roles: user.roles,
        })
    }

    /// Look up a user by username, cached in the `users` namespace.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no such account exists.
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserView, ServiceError> {
        if let Some(view) = self.cache.get_user(username).await {
            return Ok(view);
        }

        let user = self
            .users
            .find_by_username(username)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("user {username}")))?;

        let view = UserView::from(&user);
        self.cache.put_user(view.clone()).await;
        Ok(view)
    }

    /// Resolve a bearer token to the principal it was issued to.
    ///
    /// Returns `None` for unknown or expired tokens and for accounts that
    /// have since vanished or been disabled.
    pub async fn authenticate(&self, token: &str) -> Option<Principal> {
        let username = self.cache.session_username(token).await?;
        let view = self.get_user_by_username(&username).await.ok()?;
        if !view.enabled {
            return None;
        }
        Some(Principal {
            username: view.username,
            roles: view.roles,
        })
    }

    /// Issue an opaque token bound to `username`.
    async fn issue_token(&self, username: &str) -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.cache
            .bind_session(token.clone(), username.to_owned())
            .await;
        token
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), ServiceError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| ServiceError::Internal(format!("bad hash: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ServiceError::InvalidCredentials)
}
