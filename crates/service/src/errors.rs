use common::utils::slug::SlugError;
use common::utils::sorting::SortError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    /// A third-party provider (mail, calendar, media) failed.
    #[error("integration error: {0}")]
    Integration(String),
    /// The feature needs a provider that is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("too many submissions, try again later")]
    Throttled,
    #[error("payload too large: {0}")]
    TooLarge(String),
    #[error("unsupported media type: {0}")]
    Unsupported(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
            return ServiceError::Conflict(msg);
        }
        ServiceError::Db(e.to_string())
    }
}

impl From<SortError> for ServiceError {
    fn from(e: SortError) -> Self { ServiceError::Validation(e.to_string()) }
}

impl From<SlugError> for ServiceError {
    fn from(e: SlugError) -> Self { ServiceError::Validation(e.to_string()) }
}
