use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::company::domain::{CompanyRequest, CompanyResponse};
use tracing::info;

use crate::{errors::JsonApiError, state::AppState};

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.body_text())).with_code(1001))
}

#[utoipa::path(
    post, path = "/api/v1/companies", tag = "companies",
    request_body = crate::openapi::CompanyRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CompanyResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Name or email already exists")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CompanyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompanyResponse>), JsonApiError> {
    let req = body(payload)?;
    let created = state.companies.create(req).await?;
    info!(company_id = created.id_company, "company_create_request");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company id")),
    request_body = crate::openapi::CompanyRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CompanyResponseDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Name or email taken by another company")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<CompanyRequest>, JsonRejection>,
) -> Result<Json<CompanyResponse>, JsonApiError> {
    let req = body(payload)?;
    Ok(Json(state.companies.update(id, req).await?))
}

#[utoipa::path(
    get, path = "/api/v1/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CompanyResponseDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<CompanyResponse>, JsonApiError> {
    Ok(Json(state.companies.find_by_id(id).await?))
}

#[utoipa::path(
    get, path = "/api/v1/companies", tag = "companies",
    responses((status = 200, description = "List OK", body = [crate::openapi::CompanyResponseDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CompanyResponse>>, JsonApiError> {
    Ok(Json(state.companies.find_all().await?))
}

#[utoipa::path(
    delete, path = "/api/v1/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Company still has users")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.companies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
