//! Player account management, restricted to administrators at the routes.

use crate::{
    dao::models::{NewPlayer, PlayerEntity, PlayerPatch, Role},
    error::ServiceError,
    services::auth_service::hash_password,
    state::SharedState,
};

/// All player accounts ordered by name.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerEntity>, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.list_players().await?)
}

/// Fetch one player account.
pub async fn get_player(state: &SharedState, id: i64) -> Result<PlayerEntity, ServiceError> {
    let store = state.require_score_store().await?;
    store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))
}

/// Create a regular player account with the given cleartext password.
pub async fn create_player(
    state: &SharedState,
    name: String,
    email: String,
    password: String,
) -> Result<PlayerEntity, ServiceError> {
    let password_hash = hash_password(&password)?;
    let store = state.require_score_store().await?;
    Ok(store
        .create_player(NewPlayer {
            name,
            email,
            password_hash,
            role: Role::Player,
        })
        .await?)
}

/// Patch a player account's name and/or password.
pub async fn update_player(
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
    Ok(store
        .update_player(
            id,
            PlayerPatch {
                name,
                password_hash,
            },
        )
        .await?)
}

/// Delete a player account and its roster rows everywhere. Administrator
/// accounts cannot be deleted.
pub async fn delete_player(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let store = state.require_score_store().await?;
    let player = store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))?;

    if player.role == Role::Admin {
        return Err(ServiceError::Forbidden(
            "administrator accounts cannot be deleted".into(),
        ));
    }

    Ok(store.delete_player(id).await?)
}
