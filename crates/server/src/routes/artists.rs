use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use common::types::Availability;
use models::{artist, artwork};
use service::artists::domain::{
    ArtistFilter, ArtistInput, ArtistPatch, ArtworkInput, ArtworkPatch, EmailCheck, GalleryQuery, PublicArtistQuery,
    SlugCheck,
};
use service::listing::ListQuery;
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::ApiResult;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

// ---- public ----

#[utoipa::path(get, path = "/api/artists", tag = "public", params(("featured" = Option<bool>, Query, description = "Only featured artists"), ("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Page size")), responses((status = 200, description = "Active artists")))]
pub async fn list_public(State(state): State<ServerState>, ApiQuery(q): ApiQuery<PublicArtistQuery>) -> ApiResult<Page<artist::Model>> {
    Ok(Json(state.services.artists.list_public(&q).await?))
}

#[utoipa::path(get, path = "/api/artists/{slug}", tag = "public", params(("slug" = String, Path, description = "Artist slug")), responses((status = 200, description = "Artist"), (status = 404, description = "Not Found")))]
pub async fn get_public(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> ApiResult<artist::Model> {
    Ok(Json(state.services.artists.get_public(&slug).await?))
}

#[utoipa::path(get, path = "/api/artists/{slug}/artworks", tag = "public", params(("slug" = String, Path, description = "Artist slug")), responses((status = 200, description = "Gallery page"), (status = 404, description = "Not Found")))]
pub async fn gallery(
    State(state): State<ServerState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(q): ApiQuery<GalleryQuery>,
) -> ApiResult<Page<artwork::Model>> {
    Ok(Json(state.services.artists.gallery(&slug, q.page, q.per_page).await?))
}

// ---- admin ----

#[utoipa::path(get, path = "/api/admin/artists", tag = "admin", responses((status = 200, description = "Artist table page"), (status = 400, description = "Unknown sort field")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<ArtistFilter>,
) -> ApiResult<Page<artist::Model>> {
    Ok(Json(state.services.artists.list(&q, &filter).await?))
}

#[utoipa::path(post, path = "/api/admin/artists", tag = "admin", responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Slug or email taken")))]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<ArtistInput>,
) -> Result<(StatusCode, Json<artist::Model>), JsonApiError> {
    let created = state.services.artists.create(input).await?;
    tracing::info!(artist_id = %created.id, slug = %created.slug, "artist created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/admin/artists/check-slug", tag = "admin", params(("slug" = String, Query, description = "Candidate slug"), ("exclude_id" = Option<Uuid>, Query, description = "Artist being edited")), responses((status = 200, description = "Availability")))]
pub async fn check_slug(State(state): State<ServerState>, ApiQuery(q): ApiQuery<SlugCheck>) -> ApiResult<Availability> {
    Ok(Json(state.services.artists.check_slug(&q.slug, q.exclude_id).await?))
}

#[utoipa::path(get, path = "/api/admin/artists/check-email", tag = "admin", params(("email" = String, Query, description = "Candidate email"), ("exclude_id" = Option<Uuid>, Query, description = "Artist being edited")), responses((status = 200, description = "Availability")))]
pub async fn check_email(State(state): State<ServerState>, ApiQuery(q): ApiQuery<EmailCheck>) -> ApiResult<Availability> {
    Ok(Json(state.services.artists.check_email(&q.email, q.exclude_id).await?))
}

#[utoipa::path(get, path = "/api/admin/artists/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Artist id")), responses((status = 200, description = "Artist"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<artist::Model> {
    Ok(Json(state.services.artists.get(id).await?))
}

#[utoipa::path(put, path = "/api/admin/artists/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Artist id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 409, description = "Slug or email taken")))]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ArtistPatch>,
) -> ApiResult<artist::Model> {
    Ok(Json(state.services.artists.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/admin/artists/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Artist id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.artists.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/artists/{id}/artworks", tag = "admin", params(("id" = Uuid, Path, description = "Artist id")), responses((status = 200, description = "All artworks in gallery order")))]
pub async fn list_artworks(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Vec<artwork::Model>> {
    Ok(Json(state.services.artists.artworks(id).await?))
}

#[utoipa::path(post, path = "/api/admin/artists/{id}/artworks", tag = "admin", params(("id" = Uuid, Path, description = "Artist id")), responses((status = 201, description = "Created"), (status = 404, description = "Not Found")))]
pub async fn add_artwork(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ArtworkInput>,
) -> Result<(StatusCode, Json<artwork::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.services.artists.add_artwork(id, input).await?)))
}

#[utoipa::path(put, path = "/api/admin/artworks/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Artwork id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_artwork(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ArtworkPatch>,
) -> ApiResult<artwork::Model> {
    Ok(Json(state.services.artists.update_artwork(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/admin/artworks/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Artwork id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_artwork(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.artists.delete_artwork(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
