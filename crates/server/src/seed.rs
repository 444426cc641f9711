//! Demo data loaded at startup.
//!
//! Populates an empty store with an administrator, a regular user, and a few
//! loans in each lifecycle state so the API is explorable immediately. The
//! demo credentials are logged; nothing here runs when the store already
//! holds users or when seeding is disabled.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

use loanbook_core::{Email, LoanStatus, Role};

use crate::models::{NewLoan, NewUser};
use crate::services::ServiceError;
use crate::services::auth::hash_password;
use crate::state::AppState;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@demo.test";
const USER_USERNAME: &str = "morgan";
const USER_EMAIL: &str = "morgan@demo.test";
const DEMO_PASSWORD: &str = "demo1234";

/// Load demo users and loans into an empty store.
///
/// # Errors
///
/// Returns an error when a demo record cannot be created; only expected on
/// a non-empty store, which this function refuses to touch.
pub async fn load_demo_data(state: &AppState) -> Result<(), ServiceError> {
    if state.users().count().await > 0 {
        return Ok(());
    }

    info!("loading demo data");

    let admin = state
        .users()
        .insert(NewUser {
            username: ADMIN_USERNAME.to_owned(),
            email: parse_email(ADMIN_EMAIL)?,
            password_hash: hash_password(DEMO_PASSWORD)?,
            full_name: "System Administrator".to_owned(),
            roles: BTreeSet::from([Role::Admin, Role::User]),
            enabled: true,
        })
        .await
        .map_err(|_| ServiceError::DuplicateIdentity("demo admin".to_owned()))?;

    let user = state
        .users()
        .insert(NewUser {
            username: USER_USERNAME.to_owned(),
            email: parse_email(USER_EMAIL)?,
            password_hash: hash_password(DEMO_PASSWORD)?,
            full_name: "Morgan Sample".to_owned(),
            roles: BTreeSet::from([Role::User]),
            enabled: true,
        })
        .await
        .map_err(|_| ServiceError::DuplicateIdentity("demo user".to_owned()))?;

    let now = Utc::now();

    state
        .loans()
        .insert(NewLoan::pending(
            Decimal::new(500_000, 2),
            12,
            "Home improvements".to_owned(),
            user.id,
            user.username.clone(),
            now - Duration::days(5),
        ))
        .await;

    state
        .loans()
        .insert(NewLoan {
            amount: Decimal::new(1_000_000, 2),
            term_months: 24,
            purpose: "Business investment".to_owned(),
            owner_id: user.id,
            owner_username: user.username.clone(),
            status: LoanStatus::Approved,
            rejection_reason: None,
            requested_at: now - Duration::days(10),
            reviewed_at: Some(now - Duration::days(2)),
            reviewed_by: Some(admin.username.clone()),
            updated_at: now - Duration::days(2),
        })
        .await;

    state
        .loans()
        .insert(NewLoan::pending(
            Decimal::new(300_000, 2),
            6,
            "Medical expenses".to_owned(),
            user.id,
            user.username.clone(),
            now - Duration::days(3),
        ))
        .await;

    state
        .loans()
        .insert(NewLoan {
            amount: Decimal::new(1_500_000, 2),
            term_months: 36,
            purpose: "Vehicle purchase".to_owned(),
            owner_id: user.id,
            owner_username: user.username.clone(),
            status: LoanStatus::Rejected,
            rejection_reason: Some("Amount exceeds the permitted limit".to_owned()),
            requested_at: now - Duration::days(7),
            reviewed_at: Some(now - Duration::days(1)),
            reviewed_by: Some(admin.username),
            updated_at: now - Duration::days(1),
        })
        .await;

    info!("demo data loaded; login with:");
    info!("  - {ADMIN_EMAIL} / {DEMO_PASSWORD} (administrator)");
    info!("  - {USER_EMAIL} / {DEMO_PASSWORD} (user)");

    Ok(())
}

fn parse_email(raw: &str) -> Result<Email, ServiceError> {
    Email::parse(raw).map_err(|e| ServiceError::InvalidInput(e.to_string()))
}
