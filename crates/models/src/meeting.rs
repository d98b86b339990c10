use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{artist, errors::ModelError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meeting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub artist_id: Option<Uuid>,
    pub start_time: DateTimeWithTimeZone,
    pub duration_minutes: i32,
    /// IANA zone name shown to the attendee; times are stored in UTC.
    pub timezone: String,
    pub meeting_link: Option<String>,
    pub calendar_event_id: Option<String>,
    pub status: MeetingStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Artist }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Artist => Entity::belongs_to(artist::Entity)
                .from(Column::ArtistId)
                .to(artist::Column::Id)
                .into(),
        }
    }
}

impl Related<artist::Entity> for Entity {
    fn to() -> RelationDef { Relation::Artist.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time.with_timezone(&Utc) + Duration::minutes(self.duration_minutes as i64)
    }
}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] =
        &["title", "attendee_name", "attendee_email", "start_time", "duration_minutes", "status", "created_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "attendee_name" => SortValue::text(&self.attendee_name),
            "attendee_email" => SortValue::text(&self.attendee_email),
            "start_time" => SortValue::time(&self.start_time),
            "duration_minutes" => SortValue::Int(self.duration_minutes as i64),
            "status" => SortValue::text(self.status.as_str()),
            "created_at" => SortValue::time(&self.created_at),
            _ => SortValue::Null,
        }
    }
}

pub const MIN_DURATION_MINUTES: i32 = 15;
pub const MAX_DURATION_MINUTES: i32 = 480;

pub fn validate_duration(minutes: i32) -> Result<i32, ModelError> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(ModelError::Validation(format!(
            "duration_minutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}"
        )));
    }
    Ok(minutes)
}

/// Meetings can only be booked in the future.
pub fn validate_start(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>, ModelError> {
    if start <= now {
        return Err(ModelError::Validation("start_time must be in the future".into()));
    }
    Ok(start)
}

/// Loose IANA-name check (`Area/Location` or `UTC`).
pub fn validate_timezone(tz: &str) -> Result<String, ModelError> {
    let tz = tz.trim();
    if tz.is_empty() {
        return Ok("UTC".into());
    }
    let ok = tz == "UTC"
        || (tz.contains('/')
            && tz.chars().all(|c| c.is_ascii_alphanumeric() || "/_-+".contains(c))
            && !tz.starts_with('/')
            && !tz.ends_with('/'));
    if !ok || tz.len() > 64 {
        return Err(ModelError::Validation("timezone must be an IANA zone name".into()));
    }
    Ok(tz.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds() {
        assert!(validate_duration(10).is_err());
        assert!(validate_duration(481).is_err());
        assert_eq!(validate_duration(30).unwrap(), 30);
    }

    #[test]
    fn start_must_be_future() {
        let now = Utc::now();
        assert!(validate_start(now - Duration::minutes(1), now).is_err());
        assert!(validate_start(now + Duration::hours(1), now).is_ok());
    }

    #[test]
    fn timezones() {
        assert_eq!(validate_timezone("").unwrap(), "UTC");
        assert_eq!(validate_timezone("Europe/Paris").unwrap(), "Europe/Paris");
        assert_eq!(validate_timezone("America/Argentina/Buenos_Aires").unwrap(), "America/Argentina/Buenos_Aires");
        assert!(validate_timezone("Paris").is_err());
        assert!(validate_timezone("Europe/Paris; DROP").is_err());
    }
}
