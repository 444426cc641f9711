//! User domain types.
//!
//! These types represent validated domain objects separate from the record
//! store's internal bookkeeping.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loanbook_core::{Email, Role, UserId};

/// A registered account.
///
/// Immutable after creation as far as the loan lifecycle is concerned; the
/// engine only ever reads users.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username, used as the principal name.
    pub username: String,
    /// Unique email address, used for login.
    pub email: Email,
    /// Argon2 hash of the account password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Role tags. Deterministically ordered so views serialize stably.
    pub roles: BTreeSet<Role>,
    /// Disabled accounts cannot authenticate or request loans.
    pub enabled: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this account carries the ADMIN role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Data for creating a [`User`]; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
    pub enabled: bool,
}

/// The authenticated identity performing an operation.
///
/// Resolved once per request by the auth middleware and passed explicitly to
/// every service operation that needs it.
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    /// Whether the principal carries the ADMIN role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            roles: user.roles.clone(),
        }
    }
}

/// Response view of a user. Never exposes the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
    pub enabled: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            roles: user.roles.clone(),
            enabled: user.enabled,
        }
    }
}
