use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use service::integrations::UploadedMedia;

use super::auth::ServerState;
use crate::errors::JsonApiError;

struct FilePart {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    let status = e.status();
    let title = if status == StatusCode::PAYLOAD_TOO_LARGE { "Payload Too Large" } else { "Invalid Upload" };
    JsonApiError::new(status, title, Some(e.body_text()))
}

fn multipart_rejection(r: MultipartRejection) -> JsonApiError {
    JsonApiError::bad_request(r.body_text())
}

/// Multipart `file` plus optional `folder`, forwarded to the media host.
#[utoipa::path(post, path = "/api/upload", tag = "admin", responses((status = 200, description = "Uploaded media"), (status = 400, description = "Missing or empty file"), (status = 413, description = "Payload Too Large"), (status = 415, description = "Unsupported Media Type"), (status = 503, description = "Media host not configured")))]
pub async fn upload(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedMedia>, JsonApiError> {
    let mut multipart = multipart.map_err(multipart_rejection)?;
    let mut file: Option<FilePart> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some(FilePart { filename, content_type, bytes: bytes.to_vec() });
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(JsonApiError::bad_request("multipart field `file` is required"));
    };
    let uploaded = state
        .services
        .uploads
        .upload(&file.filename, &file.content_type, file.bytes, folder.as_deref())
        .await?;
    tracing::info!(public_id = %uploaded.public_id, bytes = uploaded.bytes, "media uploaded");
    Ok(Json(uploaded))
}
