//! User record store.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use loanbook_core::UserId;

use crate::models::{NewUser, User};

/// Which unique field an insert collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
}

/// Keyed store of user accounts with unique usernames and emails.
#[derive(Debug, Default)]
pub struct UserStore {
    inner: RwLock<UserTable>,
}

#[derive(Debug, Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    next_id: i64,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new user, assigning its ID.
    ///
    /// Uniqueness of username and email is enforced under the write lock, so
    /// two concurrent registrations of the same identity cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns the colliding field when the username or email is taken.
    pub async fn insert(&self, new: NewUser) -> Result<User, DuplicateField> {
        let mut table = self.inner.write().await;

        if table.rows.values().any(|u| u.username == new.username) {
            return Err(DuplicateField::Username);
        }
        if table.rows.values().any(|u| u.email == new.email) {
            return Err(DuplicateField::Email);
        }

        table.next_id += 1;
        let user = User {
            id: UserId::new(table.next_id),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            full_name: new.full_name,
            roles: new.roles,
            enabled: new.enabled,
            created_at: Utc::now(),
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }

    pub async fn count(&self) -> u64 {
        self.inner.read().await.rows.len() as u64
    }
}
