use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use models::feedback;
use service::feedback::{ApprovalUpdate, FeedbackFilter, FeedbackInput, TestimonialQuery};
use service::listing::ListQuery;
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::{throttle_submission, ApiResult};
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[utoipa::path(post, path = "/api/feedback", tag = "public", responses((status = 201, description = "Awaiting approval"), (status = 400, description = "Validation Error"), (status = 429, description = "Throttled")))]
pub async fn submit(
    State(state): State<ServerState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(input): ApiJson<FeedbackInput>,
) -> Result<(StatusCode, Json<feedback::Model>), JsonApiError> {
    throttle_submission(&state, &headers, peer)?;
    Ok((StatusCode::CREATED, Json(state.services.feedback.submit(input).await?)))
}

#[utoipa::path(get, path = "/api/feedback", tag = "public", responses((status = 200, description = "Approved testimonials, newest first")))]
pub async fn testimonials(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<TestimonialQuery>,
) -> ApiResult<Page<feedback::Model>> {
    Ok(Json(state.services.feedback.testimonials(&q).await?))
}

#[utoipa::path(get, path = "/api/admin/feedback", tag = "admin", responses((status = 200, description = "Feedback table page")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<FeedbackFilter>,
) -> ApiResult<Page<feedback::Model>> {
    Ok(Json(state.services.feedback.list(&q, &filter).await?))
}

#[utoipa::path(patch, path = "/api/admin/feedback/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Feedback id")), responses((status = 200, description = "Approval changed"), (status = 404, description = "Not Found")))]
pub async fn set_approved(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<ApprovalUpdate>,
) -> ApiResult<feedback::Model> {
    Ok(Json(state.services.feedback.set_approved(id, update.approved).await?))
}

#[utoipa::path(delete, path = "/api/admin/feedback/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Feedback id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.services.feedback.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
