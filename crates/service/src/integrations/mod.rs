//! Outbound providers: transactional email, calendar with video links,
//! media hosting. Each sits behind a trait with an HTTP implementation, a
//! disabled implementation for unconfigured deployments, and a recording
//! mock for tests.

use std::time::Duration;

use crate::errors::ServiceError;

pub mod calendar;
pub mod mail;
pub mod media;
pub mod templates;

pub use calendar::{CalendarEvent, CalendarProvider, CreatedEvent, DisabledCalendar, HttpCalendar};
pub use mail::{DisabledMailer, Email, HttpMailer, Mailer};
pub use media::{DisabledMediaStore, HttpMediaStore, MediaStore, UploadFile, UploadedMedia};

const HTTP_TIMEOUT_SECS: u64 = 20;

/// Client shared by the HTTP providers.
pub(crate) fn http_client() -> Result<reqwest::Client, ServiceError> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| ServiceError::Integration(e.to_string()))
}

/// Turn a non-2xx provider response into an integration error carrying the
/// provider's body.
pub(crate) async fn check_status(provider: &str, response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(300).collect();
    Err(ServiceError::Integration(format!("{provider} returned {status}: {snippet}")))
}

pub(crate) fn transport_error(provider: &str, e: reqwest::Error) -> ServiceError {
    ServiceError::Integration(format!("{provider} request failed: {e}"))
}
