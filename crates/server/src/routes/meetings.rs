use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use models::meeting;
use service::listing::ListQuery;
use service::meetings::{CancelInput, MeetingFilter, ScheduleMeetingInput, ScheduledMeeting};
use service::pagination::Page;
use uuid::Uuid;

use super::auth::ServerState;
use super::ApiResult;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

/// Calendar event first, then the stored meeting, then the invitation.
#[utoipa::path(post, path = "/api/admin/schedule-meeting", tag = "admin", responses((status = 201, description = "Scheduled; `invitation_sent` reports the email outcome"), (status = 400, description = "Validation Error"), (status = 502, description = "Calendar provider failed")))]
pub async fn schedule(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<ScheduleMeetingInput>,
) -> Result<(StatusCode, Json<ScheduledMeeting>), JsonApiError> {
    let scheduled = state.services.meetings.schedule(input).await?;
    tracing::info!(
        meeting_id = %scheduled.meeting.id,
        invitation_sent = scheduled.invitation_sent,
        "meeting scheduled"
    );
    Ok((StatusCode::CREATED, Json(scheduled)))
}

#[utoipa::path(get, path = "/api/admin/meetings", tag = "admin", params(("status" = Option<String>, Query, description = "scheduled, completed or cancelled"), ("upcoming" = Option<bool>, Query, description = "Only future meetings")), responses((status = 200, description = "Meeting table page")))]
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(q): ApiQuery<ListQuery>,
    ApiQuery(filter): ApiQuery<MeetingFilter>,
) -> ApiResult<Page<meeting::Model>> {
    Ok(Json(state.services.meetings.list(&q, &filter).await?))
}

#[utoipa::path(get, path = "/api/admin/meetings/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Meeting id")), responses((status = 200, description = "Meeting"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<meeting::Model> {
    Ok(Json(state.services.meetings.get(id).await?))
}

#[utoipa::path(post, path = "/api/admin/meetings/{id}/cancel", tag = "admin", params(("id" = Uuid, Path, description = "Meeting id")), responses((status = 200, description = "Cancelled"), (status = 400, description = "Not scheduled"), (status = 404, description = "Not Found"), (status = 502, description = "Calendar provider failed")))]
pub async fn cancel(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<Json<CancelInput>>,
) -> ApiResult<meeting::Model> {
    let reason = body.and_then(|Json(c)| c.reason);
    Ok(Json(state.services.meetings.cancel(id, reason.as_deref()).await?))
}
