use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use common::types::Availability;
use models::{blog_post, comment};
use service::blog::domain::{CommentFilter, CommentInput, Moderation, PostFilter, PostInput, PostPatch, PublicPostQuery};
use service::listing::ListQuery;
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::{throttle_submission, ApiResult};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[derive(Debug, serde::Deserialize)]
pub struct PostSlugCheck {
    pub slug: String,
    pub exclude_id: Option<Uuid>,
}

// ---- public ----

#[utoipa::path(get, path = "/api/blog/posts", tag = "public", params(("tag" = Option<String>, Query, description = "Tag filter"), ("q" = Option<String>, Query, description = "Search text"), ("page" = Option<u32>, Query, description = "1-based page")), responses((status = 200, description = "Published posts, newest first")))]
pub async fn list_public(State(state): State<ServerState>, ApiQuery(q): ApiQuery<PublicPostQuery>) -> ApiResult<Page<blog_post::Model>> {
    Ok(Json(state.services.blog.list_public(&q).await?))
}

#[utoipa::path(get, path = "/api/blog/posts/{slug}", tag = "public", params(("slug" = String, Path, description = "Post slug")), responses((status = 200, description = "Post"), (status = 404, description = "Not Found")))]
pub async fn get_public(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> ApiResult<blog_post::Model> {
    Ok(Json(state.services.blog.get_public(&slug).await?))
}

#[utoipa::path(get, path = "/api/blog/posts/{slug}/comments", tag = "public", params(("slug" = String, Path, description = "Post slug")), responses((status = 200, description = "Approved comments, oldest first")))]
pub async fn list_comments(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> ApiResult<Vec<comment::Model>> {
    Ok(Json(state.services.comments.list_public(&slug).await?))
}

#[utoipa::path(post, path = "/api/blog/posts/{slug}/comments", tag = "public", params(("slug" = String, Path, description = "Post slug")), responses((status = 201, description = "Pending moderation"), (status = 404, description = "Not Found"), (status = 429, description = "Throttled")))]
pub async fn submit_comment(
    State(state): State<ServerState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiPath(slug): ApiPath<String>,
    ApiJson(input): ApiJson<CommentInput>,
) -> Result<(StatusCode, Json<comment::Model>), JsonApiError> {
    throttle_submission(&state, &headers, peer)?;
    Ok((StatusCode::CREATED, Json(state.services.comments.submit(&slug, input).await?)))
}

// ---- admin: posts ----

#[utoipa::path(get, path = "/api/admin/blog/posts", tag = "admin", responses((status = 200, description = "Post table page")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<PostFilter>,
) -> ApiResult<Page<blog_post::Model>> {
    Ok(Json(state.services.blog.list(&q, &filter).await?))
}

#[utoipa::path(post, path = "/api/admin/blog/posts", tag = "admin", responses((status = 201, description = "Created"), (status = 409, description = "Slug taken")))]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<PostInput>,
) -> Result<(StatusCode, Json<blog_post::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.services.blog.create(input).await?)))
}

#[utoipa::path(get, path = "/api/admin/blog/posts/check-slug", tag = "admin", params(("slug" = String, Query, description = "Candidate slug"), ("exclude_id" = Option<Uuid>, Query, description = "Post being edited")), responses((status = 200, description = "Availability")))]
pub async fn check_slug(State(state): State<ServerState>, ApiQuery(q): ApiQuery<PostSlugCheck>) -> ApiResult<Availability> {
    Ok(Json(state.services.blog.check_slug(&q.slug, q.exclude_id).await?))
}

#[utoipa::path(get, path = "/api/admin/blog/posts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "Post"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<blog_post::Model> {
    Ok(Json(state.services.blog.get(id).await?))
}

#[utoipa::path(put, path = "/api/admin/blog/posts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Post id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<PostPatch>,
) -> ApiResult<blog_post::Model> {
    Ok(Json(state.services.blog.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/api/admin/blog/posts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Post id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.blog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- admin: comments ----

#[utoipa::path(get, path = "/api/admin/comments", tag = "admin", responses((status = 200, description = "Comment table page")))]
pub async fn list_all_comments(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<CommentFilter>,
) -> ApiResult<Page<comment::Model>> {
    Ok(Json(state.services.comments.list(&q, &filter).await?))
}

#[utoipa::path(patch, path = "/api/admin/comments/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Comment id")), responses((status = 200, description = "Moderated"), (status = 404, description = "Not Found")))]
pub async fn moderate_comment(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(m): ApiJson<Moderation>,
) -> ApiResult<comment::Model> {
    Ok(Json(state.services.comments.moderate(id, m.status).await?))
}

#[utoipa::path(delete, path = "/api/admin/comments/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Comment id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_comment(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.comments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
