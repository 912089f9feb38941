//! ## Summary
//! Registration, login and logout.

use almanac_core::config::AuthConfig;
use almanac_core::model::User;
use almanac_core::validation::ValidationErrors;
use chrono::Utc;

use super::password::{hash_password, verify_password};
use super::session::{IssuedSession, generate_token, hash_token};
use crate::error::{ServiceError, ServiceResult};
use crate::store::{AccountStore, NewAccount, SessionGrant, Store};

pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
}

impl Registration {
    /// ## Summary
    /// Checks the form and returns it with trimmed names and a lowercase email.
    ///
    /// ## Errors
    /// Returns every failed check as a field error.
    pub fn normalized(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = normalize_email(&self.email);

        if first_name.is_empty() {
            errors.push("first_name", "This field may not be blank.");
        }
        if last_name.is_empty() {
            errors.push("last_name", "This field may not be blank.");
        }
        if !is_plausible_email(&email) {
            errors.push("email", "Enter a valid email address.");
        }
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            errors.push(
                "password",
                format!("Ensure this field has at least {PASSWORD_MIN_LEN} characters."),
            );
        }

        errors.into_result()?;

        Ok(Self {
            first_name,
            last_name,
            email,
            password: self.password,
            phone_number: self
                .phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

/// The signed-in user and the session just issued for them.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub session: IssuedSession,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

async fn issue_session(
    store: &dyn Store,
    config: &AuthConfig,
    user: User,
) -> ServiceResult<AuthOutcome> {
    let token = generate_token();
    let expires_at = Utc::now() + config.session_ttl();

    store
        .insert_session(SessionGrant {
            user_id: user.id,
            token_hash: hash_token(&token),
            expires_at,
        })
        .await?;

    Ok(AuthOutcome {
        user,
        session: IssuedSession { token, expires_at },
    })
}

/// ## Summary
/// Creates an account and signs it in.
///
/// ## Errors
/// - `Forbidden` if registration is disabled
/// - `ValidationError` for an invalid form
/// - `Conflict` on `email` if the address is already registered
#[tracing::instrument(skip(store, config, registration), fields(email = %registration.email))]
pub async fn register(
    store: &dyn Store,
    config: &AuthConfig,
    registration: Registration,
) -> ServiceResult<AuthOutcome> {
    if !config.allow_registration {
        return Err(ServiceError::Forbidden(
            "Registration is disabled.".to_string(),
        ));
    }

    let registration = registration.normalized()?;
    let password_hash = hash_password(&registration.password)?;

    let user = store
        .insert_account(NewAccount {
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            phone_number: registration.phone_number,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    issue_session(store, config, user).await
}

/// ## Summary
/// Checks email and password and issues a new session.
///
/// ## Errors
/// Returns `NotAuthenticated` for an unknown email or a wrong password.
#[tracing::instrument(skip(store, config, password))]
pub async fn login(
    store: &dyn Store,
    config: &AuthConfig,
    email: &str,
    password: &str,
) -> ServiceResult<AuthOutcome> {
    let user = check_credentials(store, email, password).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    issue_session(store, config, user).await
}

/// ## Summary
/// Resolves an account from an email and password without issuing a session.
///
/// ## Errors
/// Returns `NotAuthenticated` for an unknown email or a wrong password.
pub async fn check_credentials(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> ServiceResult<User> {
    let account = store
        .find_account(&normalize_email(email))
        .await?
        .ok_or(ServiceError::NotAuthenticated)?;

    verify_password(password, &account.password_hash)?;

    Ok(account.user)
}

/// ## Summary
/// Drops the session behind `token`. Unknown tokens are ignored.
///
/// ## Errors
/// Returns an error if the store fails.
#[tracing::instrument(skip_all)]
pub async fn logout(store: &dyn Store, token: &str) -> ServiceResult<()> {
    store.delete_session(&hash_token(token)).await
}
