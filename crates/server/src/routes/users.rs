use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::user::domain::{UserRequest, UserResponse};
use tracing::info;

use super::companies::body;
use crate::{errors::JsonApiError, state::AppState};

#[utoipa::path(
    post, path = "/api/v1/users", tag = "users",
    request_body = crate::openapi::UserRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), JsonApiError> {
    let req = body(payload)?;
    let created = state.users.create(req).await?;
    info!(user_id = created.id, company_id = created.company_id, "user_create_request");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = crate::openapi::UserRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "User or company not found"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, JsonApiError> {
    let req = body(payload)?;
    Ok(Json(state.users.update(id, req).await?))
}

#[utoipa::path(
    get, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::UserResponseDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<UserResponse>, JsonApiError> {
    Ok(Json(state.users.find_by_id(id).await?))
}

#[utoipa::path(
    get, path = "/api/v1/users", tag = "users",
    responses((status = 200, description = "List OK", body = [crate::openapi::UserResponseDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, JsonApiError> {
    Ok(Json(state.users.find_all().await?))
}

#[utoipa::path(
    delete, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
