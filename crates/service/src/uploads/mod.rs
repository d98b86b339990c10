//! Admin media uploads forwarded to the hosting provider.

use std::sync::Arc;

use common::utils::slug::slugify;
use tracing::instrument;

use crate::errors::ServiceError;
use crate::integrations::media::is_allowed_content_type;
use crate::integrations::{MediaStore, UploadFile, UploadedMedia};

pub struct UploadService {
    store: Arc<dyn MediaStore>,
    max_bytes: usize,
    root_folder: String,
}

impl UploadService {
    pub fn new(store: Arc<dyn MediaStore>, max_bytes: usize, root_folder: impl Into<String>) -> Self {
        Self { store, max_bytes, root_folder: root_folder.into() }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Provider folder: the configured root plus an optional sub-folder made
    /// of slug segments.
    pub fn folder_for(&self, sub: Option<&str>) -> String {
        let segments: Vec<String> = sub
            .unwrap_or("")
            .split('/')
            .filter_map(|s| slugify(s).ok())
            .collect();
        if segments.is_empty() {
            self.root_folder.clone()
        } else {
            format!("{}/{}", self.root_folder, segments.join("/"))
        }
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
        folder: Option<&str>,
    ) -> Result<UploadedMedia, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Validation("file is empty".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ServiceError::TooLarge(format!("file exceeds {} bytes", self.max_bytes)));
        }
        if !is_allowed_content_type(content_type) {
            return Err(ServiceError::Unsupported(format!("{content_type} is not accepted")));
        }
        let filename = match filename.trim() {
            "" => "upload".to_string(),
            name => name.rsplit(['/', '\\']).next().unwrap_or(name).to_string(),
        };
        let file = UploadFile { filename, content_type: content_type.to_string(), bytes, folder: self.folder_for(folder) };
        self.store.upload(file).await
    }
}
