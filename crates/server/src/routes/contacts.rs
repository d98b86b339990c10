use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use models::contact_message;
use service::contacts::domain::{ContactFilter, ContactInput, ReplyInput, StatusUpdate, ThreadMessage};
use service::listing::{ListQuery, SinceQuery};
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::{throttle_submission, ApiResult};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[utoipa::path(post, path = "/api/contact", tag = "public", responses((status = 201, description = "Message received"), (status = 400, description = "Validation Error"), (status = 429, description = "Throttled")))]
pub async fn submit(
    State(state): State<ServerState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<contact_message::Model>), JsonApiError> {
    throttle_submission(&state, &headers, peer)?;
    Ok((StatusCode::CREATED, Json(state.services.contacts.submit(input).await?)))
}

#[utoipa::path(get, path = "/api/admin/contacts", tag = "admin", responses((status = 200, description = "Inbox page")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<ContactFilter>,
) -> ApiResult<Page<contact_message::Model>> {
    Ok(Json(state.services.contacts.list(&q, &filter).await?))
}

/// Opening a message in the admin marks it read.
#[utoipa::path(get, path = "/api/admin/contacts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Message id")), responses((status = 200, description = "Message"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<contact_message::Model> {
    Ok(Json(state.services.contacts.open(id).await?))
}

#[utoipa::path(patch, path = "/api/admin/contacts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Message id")), responses((status = 200, description = "Status changed"), (status = 404, description = "Not Found")))]
pub async fn set_status(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> ApiResult<contact_message::Model> {
    Ok(Json(state.services.contacts.set_status(id, update.status).await?))
}

#[utoipa::path(delete, path = "/api/admin/contacts/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Message id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.contacts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/admin/contacts/{id}/messages", tag = "admin", params(("id" = Uuid, Path, description = "Message id"), ("since" = Option<String>, Query, description = "RFC 3339 timestamp; only newer messages")), responses((status = 200, description = "Conversation"), (status = 404, description = "Not Found")))]
pub async fn thread(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(q): ApiQuery<SinceQuery>,
) -> ApiResult<Vec<ThreadMessage>> {
    Ok(Json(state.services.contacts.thread(id, q.since).await?))
}

#[utoipa::path(post, path = "/api/admin/contacts/{id}/messages", tag = "admin", params(("id" = Uuid, Path, description = "Message id")), responses((status = 201, description = "Reply sent"), (status = 404, description = "Not Found"), (status = 502, description = "Mail provider failed")))]
pub async fn reply(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ReplyInput>,
) -> Result<(StatusCode, Json<ThreadMessage>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.services.contacts.reply(id, &input.body).await?)))
}
