//! Authentication and profile self-service.
//!
//! Passwords are bcrypt-hashed at this boundary; no store implementation
//! ever receives or returns cleartext.

use crate::{
    dao::models::{PlayerEntity, PlayerPatch},
    error::ServiceError,
    jwt,
    state::SharedState,
};

/// Hash a cleartext password for storage.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
}

/// Verify credentials and issue a session token.
///
/// Unknown emails and wrong passwords are indistinguishable to the caller.
pub async fn login(
    state: &SharedState,
    email: String,
    password: String,
) -> Result<(String, PlayerEntity), ServiceError> {
    let store = state.require_score_store().await?;
    let credentials = store
        .find_credentials(email)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("invalid email or password".into()))?;

    let valid = bcrypt::verify(&password, &credentials.password_hash)
        .map_err(|err| ServiceError::Internal(format!("password verification failed: {err}")))?;
    if !valid {
        return Err(ServiceError::Unauthorized("invalid email or password".into()));
    }

    let token = jwt::generate_token(&credentials.player)?;
    Ok((token, credentials.player))
}

/// Self-service registration is permanently disabled: accounts are
/// provisioned by administrators.
pub fn register() -> ServiceError {
    ServiceError::Forbidden("registration is disabled; ask an administrator for an account".into())
}

/// Resolve the account behind a set of verified claims. The token may
/// outlive the account it was issued for.
pub async fn current_player(state: &SharedState, id: i64) -> Result<PlayerEntity, ServiceError> {
    let store = state.require_score_store().await?;
    store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("account no longer exists".into()))
}

/// Update the authenticated account's own name and/or password.
pub async fn update_profile(
    state: &SharedState,
    id: i64,
    name: Option<String>,
    password: Option<String>,
) -> Result<PlayerEntity, ServiceError> {
    if name.is_none() && password.is_none() {
        return Err(ServiceError::InvalidInput("nothing to update".into()));
    }

    let password_hash = password.as_deref().map(hash_password).transpose()?;
    let store = state.require_score_store().await?;
    let patch = PlayerPatch {
        name,
        password_hash,
    };
    Ok(store.update_player(id, patch).await?)
}
