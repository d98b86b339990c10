use async_trait::async_trait;
use configs::MediaConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{check_status, http_client, transport_error};
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub folder: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
    pub bytes: u64,
    pub content_type: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, ServiceError>;
}

/// `image/*`, `video/mp4` and `application/pdf`.
pub fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("image", sub)) => !sub.is_empty(),
        _ => essence == "video/mp4" || essence == "application/pdf",
    }
}

/// Unsigned-preset upload API (multipart `file`, `upload_preset`, `folder`).
pub struct HttpMediaStore {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl HttpMediaStore {
    pub fn new(cfg: &MediaConfig) -> Result<Self, ServiceError> {
        Ok(Self { client: http_client()?, upload_url: cfg.upload_url.clone(), upload_preset: cfg.upload_preset.clone() })
    }
}

pub fn parse_upload_response(body: &Value, content_type: &str) -> Result<UploadedMedia, ServiceError> {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Integration(format!("media response has no {name}")))
    };
    Ok(UploadedMedia {
        url: field("secure_url")?,
        public_id: field("public_id")?,
        bytes: body.get("bytes").and_then(Value::as_u64).unwrap_or(0),
        content_type: content_type.to_string(),
    })
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, ServiceError> {
        let size = file.bytes.len();
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ServiceError::Unsupported(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", file.folder.clone());
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("media", e))?;
        let body: Value = check_status("media", response)
            .await?
            .json()
            .await
            .map_err(|e| transport_error("media", e))?;
        let uploaded = parse_upload_response(&body, &file.content_type)?;
        info!(public_id = %uploaded.public_id, size, "media uploaded");
        Ok(uploaded)
    }
}

pub struct DisabledMediaStore;

#[async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, _file: UploadFile) -> Result<UploadedMedia, ServiceError> {
        Err(ServiceError::NotConfigured("media uploads are not configured".into()))
    }
}

/// In-memory media store for tests
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockMediaStore {
        pub uploads: Mutex<Vec<UploadFile>>,
    }

    #[async_trait]
    impl MediaStore for MockMediaStore {
        async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, ServiceError> {
            let public_id = format!("{}/{}", file.folder, file.filename);
            let uploaded = UploadedMedia {
                url: format!("https://media.example.com/{public_id}"),
                public_id,
                bytes: file.bytes.len() as u64,
                content_type: file.content_type.clone(),
            };
            self.uploads.lock().unwrap().push(file);
            Ok(uploaded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allowed_types() {
        assert!(is_allowed_content_type("image/png"));
        assert!(is_allowed_content_type("IMAGE/JPEG; charset=binary"));
        assert!(is_allowed_content_type("video/mp4"));
        assert!(is_allowed_content_type("application/pdf"));
        assert!(!is_allowed_content_type("image/"));
        assert!(!is_allowed_content_type("video/quicktime"));
        assert!(!is_allowed_content_type("text/html"));
    }

    #[test]
    fn parses_provider_response() {
        let body = json!({"secure_url": "https://cdn/x.png", "public_id": "studio/x", "bytes": 2048});
        let up = parse_upload_response(&body, "image/png").unwrap();
        assert_eq!(up.url, "https://cdn/x.png");
        assert_eq!(up.bytes, 2048);
        assert!(parse_upload_response(&json!({"public_id": "x"}), "image/png").is_err());
    }

    #[tokio::test]
    async fn disabled_store_reports_not_configured() {
        let file = UploadFile { filename: "a.png".into(), content_type: "image/png".into(), bytes: vec![1], folder: "studio".into() };
        assert!(matches!(DisabledMediaStore.upload(file).await, Err(ServiceError::NotConfigured(_))));
    }
}
