//! Meetings booked by the admin: calendar event with a video link, an
//! invitation email, and the stored record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::utils::filter::matches_query;
use common::utils::sorting::SortOrder;
use models::meeting::{self, MeetingStatus};
use models::validate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::artists::repository::ArtistRepository;
use crate::errors::ServiceError;
use crate::integrations::{templates, CalendarEvent, CalendarProvider, Mailer};
use crate::listing::ListQuery;
use crate::pagination::Page;
use crate::storage::seaorm::seaorm_crud;
use crate::storage::{CrudRepository, MemoryTable};
use crate::SiteInfo;

pub trait MeetingRepository: CrudRepository<meeting::Model> {}

pub struct SeaOrmMeetingRepository {
    pub db: sea_orm::DatabaseConnection,
}

seaorm_crud!(SeaOrmMeetingRepository, meeting);

impl MeetingRepository for SeaOrmMeetingRepository {}
impl MeetingRepository for MemoryTable<meeting::Model> {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMeetingInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub artist_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub timezone: Option<String>,
    /// Used when the calendar does not attach a video link.
    pub meeting_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledMeeting {
    #[serde(flatten)]
    pub meeting: meeting::Model,
    pub invitation_sent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingFilter {
    pub status: Option<MeetingStatus>,
    /// Only meetings that have not started yet.
    pub upcoming: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelInput {
    pub reason: Option<String>,
}

pub struct MeetingService {
    meetings: Arc<dyn MeetingRepository>,
    artists: Arc<dyn ArtistRepository>,
    calendar: Arc<dyn CalendarProvider>,
    mailer: Arc<dyn Mailer>,
    site: SiteInfo,
}

impl MeetingService {
    pub fn new(
        meetings: Arc<dyn MeetingRepository>,
        artists: Arc<dyn ArtistRepository>,
        calendar: Arc<dyn CalendarProvider>,
        mailer: Arc<dyn Mailer>,
        site: SiteInfo,
    ) -> Self {
        Self { meetings, artists, calendar, mailer, site }
    }

    /// Validate, create the calendar event, store the meeting, then send the
    /// invitation. A calendar failure aborts before anything is stored; a
    /// failed invitation is reported with `invitation_sent: false`.
    #[instrument(skip(self, input), fields(title = %input.title, start = %input.start_time))]
    pub async fn schedule(&self, input: ScheduleMeetingInput) -> Result<ScheduledMeeting, ServiceError> {
        let now = Utc::now();
        let title = validate::required("title", &input.title, 200)?;
        let description = validate::bounded("description", &input.description, 5000)?;
        let attendee_name = validate::required("attendee_name", &input.attendee_name, 128)?;
        let attendee_email = validate::email("attendee_email", &input.attendee_email)?;
        let start = meeting::validate_start(input.start_time, now)?;
        let duration = meeting::validate_duration(input.duration_minutes)?;
        let timezone = meeting::validate_timezone(input.timezone.as_deref().unwrap_or(""))?;
        let fallback_link = validate::optional_url("meeting_link", input.meeting_link.as_deref())?;
        if let Some(artist_id) = input.artist_id {
            if self.artists.get(artist_id).await?.is_none() {
                return Err(ServiceError::Validation(format!("artist {artist_id} does not exist")));
            }
        }

        let id = Uuid::new_v4();
        let event = CalendarEvent {
            summary: title.clone(),
            description: description.clone(),
            start,
            end: start + chrono::Duration::minutes(duration as i64),
            timezone: timezone.clone(),
            attendee_name: attendee_name.clone(),
            attendee_email: attendee_email.clone(),
            request_id: id.to_string(),
        };
        let created = self.calendar.create_event(&event).await?;

        let stamp = crate::now();
        let model = meeting::Model {
            id,
            title,
            description,
            attendee_name,
            attendee_email,
            artist_id: input.artist_id,
            start_time: start.fixed_offset(),
            duration_minutes: duration,
            timezone,
            meeting_link: created.as_ref().and_then(|e| e.meet_link.clone()).or(fallback_link),
            calendar_event_id: created.map(|e| e.id),
            status: MeetingStatus::Scheduled,
            created_at: stamp,
            updated_at: stamp,
        };
        let saved = self.meetings.insert(model).await?;

        let invitation = templates::meeting_invitation(&self.site.name, &saved);
        let invitation_sent = match self.mailer.send(&invitation).await {
            Ok(()) => true,
            Err(e) => {
                warn!(meeting_id = %saved.id, error = %e, "meeting invitation not sent");
                false
            }
        };
        info!(meeting_id = %saved.id, invitation_sent, "meeting scheduled");
        Ok(ScheduledMeeting { meeting: saved, invitation_sent })
    }

    pub async fn list(&self, query: &ListQuery, filter: &MeetingFilter) -> Result<Page<meeting::Model>, ServiceError> {
        let rows = self.meetings.list().await?;
        let now = Utc::now();
        query.apply(rows, ("start_time", SortOrder::Asc), |m| {
            filter.status.map_or(true, |s| m.status == s)
                && (filter.upcoming != Some(true) || m.start_time > now)
                && matches_query([m.title.as_str(), m.attendee_name.as_str(), m.attendee_email.as_str()], query.search())
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<meeting::Model, ServiceError> {
        self.meetings.get(id).await?.ok_or_else(|| ServiceError::not_found("meeting"))
    }

    /// Remove the calendar event, mark the meeting cancelled and tell the
    /// attendee. Only scheduled meetings can be cancelled.
    #[instrument(skip(self, reason))]
    pub async fn cancel(&self, id: Uuid, reason: Option<&str>) -> Result<meeting::Model, ServiceError> {
        let mut m = self.get(id).await?;
        if m.status != MeetingStatus::Scheduled {
            return Err(ServiceError::Validation(format!("meeting is already {}", m.status.as_str())));
        }
        if let Some(event_id) = m.calendar_event_id.as_deref() {
            self.calendar.delete_event(event_id).await?;
        }
        m.status = MeetingStatus::Cancelled;
        m.updated_at = crate::now();
        let saved = self.meetings.update(m).await?;

        let notice = templates::meeting_cancellation(&self.site.name, &saved, reason);
        if let Err(e) = self.mailer.send(&notice).await {
            warn!(meeting_id = %saved.id, error = %e, "cancellation email not sent");
        }
        info!(meeting_id = %saved.id, "meeting cancelled");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::calendar::mock::MockCalendar;
    use crate::integrations::mail::mock::RecordingMailer;
    use crate::integrations::DisabledCalendar;
    use models::artist;

    struct Fixture {
        svc: MeetingService,
        calendar: Arc<MockCalendar>,
        mailer: Arc<RecordingMailer>,
    }

    fn fixture_with(calendar: MockCalendar, mailer: RecordingMailer) -> Fixture {
        let calendar = Arc::new(calendar);
        let mailer = Arc::new(mailer);
        let svc = MeetingService::new(
            Arc::new(MemoryTable::<meeting::Model>::new()),
            Arc::new(MemoryTable::<artist::Model>::new()),
            calendar.clone(),
            mailer.clone(),
            SiteInfo { name: "Studio".into(), inbox_email: String::new() },
        );
        Fixture { svc, calendar, mailer }
    }

    fn fixture() -> Fixture {
        fixture_with(MockCalendar::default(), RecordingMailer::default())
    }

    fn input() -> ScheduleMeetingInput {
        ScheduleMeetingInput {
            title: "Portfolio review".into(),
            description: String::new(),
            attendee_name: "Ada".into(),
            attendee_email: "ada@example.com".into(),
            artist_id: None,
            start_time: Utc::now() + chrono::Duration::days(1),
            duration_minutes: 45,
            timezone: Some("Europe/Paris".into()),
            meeting_link: None,
        }
    }

    #[tokio::test]
    async fn schedule_creates_event_then_invites() -> Result<(), anyhow::Error> {
        let f = fixture();
        let out = f.svc.schedule(input()).await?;
        assert!(out.invitation_sent);
        assert_eq!(out.meeting.calendar_event_id.as_deref(), Some("evt-1"));
        assert_eq!(out.meeting.meeting_link.as_deref(), Some("https://meet.example.com/evt-1"));
        assert_eq!(f.calendar.created.lock().unwrap().len(), 1);
        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("https://meet.example.com/evt-1"));
        Ok(())
    }

    #[tokio::test]
    async fn validates_time_duration_and_artist() {
        let f = fixture();
        let past = ScheduleMeetingInput { start_time: Utc::now() - chrono::Duration::minutes(1), ..input() };
        assert!(f.svc.schedule(past).await.is_err());
        assert!(f.svc.schedule(ScheduleMeetingInput { duration_minutes: 10, ..input() }).await.is_err());
        assert!(f.svc.schedule(ScheduleMeetingInput { duration_minutes: 481, ..input() }).await.is_err());
        let ghost = ScheduleMeetingInput { artist_id: Some(Uuid::new_v4()), ..input() };
        assert!(matches!(f.svc.schedule(ghost).await, Err(ServiceError::Validation(_))));
        assert!(f.calendar.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn calendar_failure_stores_nothing() -> Result<(), anyhow::Error> {
        let f = fixture_with(MockCalendar::failing(), RecordingMailer::default());
        assert!(matches!(f.svc.schedule(input()).await, Err(ServiceError::Integration(_))));
        assert_eq!(f.svc.list(&ListQuery::default(), &MeetingFilter::default()).await?.total, 0);
        assert!(f.mailer.sent().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn mail_failure_keeps_meeting() -> Result<(), anyhow::Error> {
        let f = fixture_with(MockCalendar::default(), RecordingMailer::failing());
        let out = f.svc.schedule(input()).await?;
        assert!(!out.invitation_sent);
        assert_eq!(f.svc.get(out.meeting.id).await?.status, MeetingStatus::Scheduled);
        Ok(())
    }

    #[tokio::test]
    async fn without_calendar_the_supplied_link_is_kept() -> Result<(), anyhow::Error> {
        let mailer = Arc::new(RecordingMailer::default());
        let svc = MeetingService::new(
            Arc::new(MemoryTable::<meeting::Model>::new()),
            Arc::new(MemoryTable::<artist::Model>::new()),
            Arc::new(DisabledCalendar),
            mailer,
            SiteInfo::default(),
        );
        let out = svc
            .schedule(ScheduleMeetingInput { meeting_link: Some("https://zoom.example.com/j/1".into()), ..input() })
            .await?;
        assert_eq!(out.meeting.calendar_event_id, None);
        assert_eq!(out.meeting.meeting_link.as_deref(), Some("https://zoom.example.com/j/1"));
        Ok(())
    }

    #[tokio::test]
    async fn cancel_deletes_event_and_notifies_once() -> Result<(), anyhow::Error> {
        let f = fixture();
        let out = f.svc.schedule(input()).await?;
        let cancelled = f.svc.cancel(out.meeting.id, Some("Double booked")).await?;
        assert_eq!(cancelled.status, MeetingStatus::Cancelled);
        assert_eq!(*f.calendar.deleted.lock().unwrap(), vec!["evt-1".to_string()]);
        assert!(f.mailer.sent().last().map_or(false, |e| e.text.contains("Double booked")));

        assert!(matches!(f.svc.cancel(out.meeting.id, None).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_upcoming_and_status() -> Result<(), anyhow::Error> {
        let f = fixture();
        let a = f.svc.schedule(input()).await?;
        f.svc.schedule(ScheduleMeetingInput { start_time: Utc::now() + chrono::Duration::days(3), ..input() }).await?;
        f.svc.cancel(a.meeting.id, None).await?;

        let scheduled = MeetingFilter { status: Some(MeetingStatus::Scheduled), upcoming: Some(true) };
        assert_eq!(f.svc.list(&ListQuery::default(), &scheduled).await?.total, 1);
        assert_eq!(f.svc.list(&ListQuery::default(), &MeetingFilter::default()).await?.total, 2);
        Ok(())
    }
}
