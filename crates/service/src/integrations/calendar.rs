use async_trait::async_trait;
use chrono::{DateTime, Utc};
use configs::CalendarConfig;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{check_status, http_client, transport_error};
use crate::errors::ServiceError;

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub attendee_name: String,
    pub attendee_email: String,
    /// Idempotency key for the conference request.
    pub request_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatedEvent {
    pub id: String,
    /// Video conference link attached by the provider.
    pub meet_link: Option<String>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// `None` when no calendar is configured.
    async fn create_event(&self, event: &CalendarEvent) -> Result<Option<CreatedEvent>, ServiceError>;
    async fn delete_event(&self, event_id: &str) -> Result<(), ServiceError>;
}

/// Google Calendar v3 events API.
pub struct HttpCalendar {
    client: reqwest::Client,
    events_url: String,
    access_token: String,
}

impl HttpCalendar {
    pub fn new(cfg: &CalendarConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client()?,
            events_url: format!("{}/calendars/{}/events", cfg.api_url.trim_end_matches('/'), cfg.calendar_id),
            access_token: cfg.access_token.clone(),
        })
    }
}

/// Request body for an event with a conference link request.
pub fn event_payload(event: &CalendarEvent) -> Value {
    json!({
        "summary": event.summary,
        "description": event.description,
        "start": { "dateTime": event.start.to_rfc3339(), "timeZone": event.timezone },
        "end": { "dateTime": event.end.to_rfc3339(), "timeZone": event.timezone },
        "attendees": [{ "email": event.attendee_email, "displayName": event.attendee_name }],
        "conferenceData": {
            "createRequest": {
                "requestId": event.request_id,
                "conferenceSolutionKey": { "type": "hangoutsMeet" }
            }
        }
    })
}

/// Event id plus the video link, from `hangoutLink` or the first video entry
/// point.
pub fn parse_created_event(body: &Value) -> Result<CreatedEvent, ServiceError> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ServiceError::Integration("calendar response has no event id".into()))?;
    let meet_link = body
        .get("hangoutLink")
        .and_then(Value::as_str)
        .or_else(|| {
            body.pointer("/conferenceData/entryPoints")
                .and_then(Value::as_array)
                .and_then(|eps| {
                    eps.iter()
                        .find(|ep| ep.get("entryPointType").and_then(Value::as_str) == Some("video"))
                        .and_then(|ep| ep.get("uri").and_then(Value::as_str))
                })
        })
        .map(str::to_string);
    Ok(CreatedEvent { id: id.to_string(), meet_link })
}

#[async_trait]
impl CalendarProvider for HttpCalendar {
    async fn create_event(&self, event: &CalendarEvent) -> Result<Option<CreatedEvent>, ServiceError> {
        debug!(summary = %event.summary, start = %event.start, "creating calendar event");
        let response = self
            .client
            .post(&self.events_url)
            .query(&[("conferenceDataVersion", "1"), ("sendUpdates", "all")])
            .bearer_auth(&self.access_token)
            .json(&event_payload(event))
            .send()
            .await
            .map_err(|e| transport_error("calendar", e))?;
        let body: Value = check_status("calendar", response)
            .await?
            .json()
            .await
            .map_err(|e| transport_error("calendar", e))?;
        let created = parse_created_event(&body)?;
        info!(event_id = %created.id, "calendar event created");
        Ok(Some(created))
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.events_url, event_id))
            .query(&[("sendUpdates", "all")])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport_error("calendar", e))?;
        // already gone counts as deleted
        if response.status() == reqwest::StatusCode::GONE || response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status("calendar", response).await?;
        info!(event_id, "calendar event deleted");
        Ok(())
    }
}

pub struct DisabledCalendar;

#[async_trait]
impl CalendarProvider for DisabledCalendar {
    async fn create_event(&self, event: &CalendarEvent) -> Result<Option<CreatedEvent>, ServiceError> {
        info!(summary = %event.summary, "calendar disabled, no event created");
        Ok(None)
    }

    async fn delete_event(&self, _event_id: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Recording calendar for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCalendar {
        pub created: Mutex<Vec<CalendarEvent>>,
        pub deleted: Mutex<Vec<String>>,
        failing: bool,
    }

    impl MockCalendar {
        pub fn failing() -> Self {
            Self { failing: true, ..Default::default() }
        }
    }

    #[async_trait]
    impl CalendarProvider for MockCalendar {
        async fn create_event(&self, event: &CalendarEvent) -> Result<Option<CreatedEvent>, ServiceError> {
            if self.failing {
                return Err(ServiceError::Integration("calendar provider unavailable".into()));
            }
            let mut created = self.created.lock().unwrap();
            created.push(event.clone());
            let n = created.len();
            Ok(Some(CreatedEvent { id: format!("evt-{n}"), meet_link: Some(format!("https://meet.example.com/evt-{n}")) }))
        }

        async fn delete_event(&self, event_id: &str) -> Result<(), ServiceError> {
            if self.failing {
                return Err(ServiceError::Integration("calendar provider unavailable".into()));
            }
            self.deleted.lock().unwrap().push(event_id.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2030, 5, 1, 14, 0, 0).unwrap();
        CalendarEvent {
            summary: "Portfolio review".into(),
            description: "Walk through the new series".into(),
            start,
            end: start + chrono::Duration::minutes(45),
            timezone: "Europe/Paris".into(),
            attendee_name: "Ada".into(),
            attendee_email: "ada@example.com".into(),
            request_id: "req-1".into(),
        }
    }

    #[test]
    fn payload_requests_a_conference() {
        let body = event_payload(&event());
        assert_eq!(body["start"]["dateTime"], "2030-05-01T14:00:00+00:00");
        assert_eq!(body["end"]["dateTime"], "2030-05-01T14:45:00+00:00");
        assert_eq!(body["attendees"][0]["email"], "ada@example.com");
        assert_eq!(body["conferenceData"]["createRequest"]["requestId"], "req-1");
    }

    #[test]
    fn parses_hangout_link_or_entry_point() {
        let direct = parse_created_event(&json!({"id": "e1", "hangoutLink": "https://meet.google.com/abc"})).unwrap();
        assert_eq!(direct.meet_link.as_deref(), Some("https://meet.google.com/abc"));

        let nested = parse_created_event(&json!({
            "id": "e2",
            "conferenceData": {"entryPoints": [
                {"entryPointType": "phone", "uri": "tel:+1"},
                {"entryPointType": "video", "uri": "https://meet.google.com/xyz"}
            ]}
        }))
        .unwrap();
        assert_eq!(nested.meet_link.as_deref(), Some("https://meet.google.com/xyz"));

        let bare = parse_created_event(&json!({"id": "e3"})).unwrap();
        assert_eq!(bare.meet_link, None);

        assert!(parse_created_event(&json!({"status": "confirmed"})).is_err());
    }
}
