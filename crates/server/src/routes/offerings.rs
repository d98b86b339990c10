use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use models::service_offering;
use service::listing::ListQuery;
use service::offerings::{OfferingFilter, OfferingInput, OfferingPatch};
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::ApiResult;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[utoipa::path(get, path = "/api/services", tag = "public", responses((status = 200, description = "Active services by position")))]
pub async fn list_public(State(state): State<ServerState>) -> ApiResult<Vec<service_offering::Model>> {
    Ok(Json(state.services.offerings.list_public().await?))
}

#[utoipa::path(get, path = "/api/services/{slug}", tag = "public", params(("slug" = String, Path, description = "Service slug")), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn get_public(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> ApiResult<service_offering::Model> {
    Ok(Json(state.services.offerings.get_public(&slug).await?))
}

#[utoipa::path(get, path = "/api/admin/services", tag = "admin", responses((status = 200, description = "Service table page")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<OfferingFilter>,
) -> ApiResult<Page<service_offering::Model>> {
    Ok(Json(state.services.offerings.list(&q, &filter).await?))
}

#[utoipa::path(post, path = "/api/admin/services", tag = "admin", responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Slug taken")))]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<OfferingInput>,
) -> Result<(StatusCode, Json<service_offering::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.services.offerings.create(input).await?)))
}

#[utoipa::path(get, path = "/api/admin/services/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<service_offering::Model> {
    Ok(Json(state.services.offerings.get(id).await?))
}

#[utoipa::path(put, path = "/api/admin/services/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Service id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<OfferingPatch>,
) -> ApiResult<service_offering::Model> {
    Ok(Json(state.services.offerings.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/admin/services/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Service id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.offerings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
