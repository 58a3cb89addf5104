//! Scoring template management.

use crate::{
    dao::models::{NewTemplate, TemplateEntity},
    error::ServiceError,
    state::SharedState,
};

/// All templates ordered by name.
pub async fn list_templates(state: &SharedState) -> Result<Vec<TemplateEntity>, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.list_templates().await?)
}

/// Fetch one template.
pub async fn get_template(state: &SharedState, id: i64) -> Result<TemplateEntity, ServiceError> {
    let store = state.require_score_store().await?;
    store
        .find_template(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("template `{id}` not found")))
}

/// Create a template.
pub async fn create_template(
    state: &SharedState,
    name: String,
    base_points: i64,
) -> Result<TemplateEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.create_template(NewTemplate { name, base_points }).await?)
}

/// Replace both fields of a template.
pub async fn update_template(
    state: &SharedState,
    id: i64,
    name: String,
    base_points: i64,
) -> Result<TemplateEntity, ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store
        .update_template(id, NewTemplate { name, base_points })
        .await?)
}

/// Delete a template. Succeeds even when the id does not exist; games that
/// reference it keep working with a dangling template id.
pub async fn delete_template(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let store = state.require_score_store().await?;
    Ok(store.delete_template(id).await?)
}
