use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use validator::Validate;

use crate::{
    dto::template::{TemplateDto, TemplateRequest},
    error::AppError,
    jwt::Claims,
    services::template_service,
    state::SharedState,
};

/// Scoring template endpoints; mutations are admin-only.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
}

/// All scoring templates.
#[utoipa::path(
    get,
    path = "/templates",
    tag = "templates",
    responses(
        (status = 200, description = "Templates ordered by name", body = [TemplateDto]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_templates(
    State(state): State<SharedState>,
    _claims: Claims,
) -> Result<Json<Vec<TemplateDto>>, AppError> {
    let templates = template_service::list_templates(&state).await?;
    Ok(Json(templates.into_iter().map(TemplateDto::from).collect()))
}

/// One scoring template.
#[utoipa::path(
    get,
    path = "/templates/{id}",
    tag = "templates",
    params(("id" = i64, Path, description = "Template identifier")),
    responses(
        (status = 200, description = "Template", body = TemplateDto),
        (status = 404, description = "Unknown template")
    )
)]
pub async fn get_template(
    State(state): State<SharedState>,
    _claims: Claims,
    Path(id): Path<i64>,
) -> Result<Json<TemplateDto>, AppError> {
    let template = template_service::get_template(&state, id).await?;
    Ok(Json(template.into()))
}

/// Create a scoring template.
#[utoipa::path(
    post,
    path = "/templates",
    tag = "templates",
    request_body = TemplateRequest,
    responses(
        (status = 201, description = "Created template", body = TemplateDto),
        (status = 400, description = "Empty name or negative base points"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn create_template(
    State(state): State<SharedState>,
    claims: Claims,
    Json(payload): Json<TemplateRequest>,
) -> Result<(StatusCode, Json<TemplateDto>), AppError> {
    claims.require_admin()?;
    payload.validate()?;
    let template =
        template_service::create_template(&state, payload.name, payload.base_points).await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

/// Replace both fields of a template.
#[utoipa::path(
    put,
    path = "/templates/{id}",
    tag = "templates",
    params(("id" = i64, Path, description = "Template identifier")),
    request_body = TemplateRequest,
    responses(
        (status = 200, description = "Updated template", body = TemplateDto),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Unknown template")
    )
)]
pub async fn update_template(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<TemplateRequest>,
) -> Result<Json<TemplateDto>, AppError> {
    claims.require_admin()?;
    payload.validate()?;
    let template =
        template_service::update_template(&state, id, payload.name, payload.base_points).await?;
    Ok(Json(template.into()))
}

/// Delete a template. Existing games keep their scores and render the
/// template as "Custom" afterwards.
#[utoipa::path(
    delete,
    path = "/templates/{id}",
    tag = "templates",
    params(("id" = i64, Path, description = "Template identifier")),
    responses(
        (status = 204, description = "Deleted (or already absent)"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn delete_template(
    State(state): State<SharedState>,
    claims: Claims,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    template_service::delete_template(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
