//! Service layer providing the studio's business operations on top of models.
//! - Separates business logic from data access (repository traits with
//!   SeaORM and in-memory backends).
//! - Reuses validation and entity definitions in `models` crate.
//! - Talks to the mail, calendar and media providers through `integrations`.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod pagination;
pub mod listing;
pub mod slugs;
pub mod cache;
pub mod throttle;
pub mod integrations;
pub mod artists;
pub mod contacts;
pub mod feedback;
pub mod blog;
pub mod offerings;
pub mod meetings;
pub mod uploads;
pub mod app;

pub use app::{AppServices, Integrations, Repositories};

use configs::SiteConfig;
use errors::ServiceError;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Site identity used in outgoing emails.
#[derive(Clone, Debug, Default)]
pub struct SiteInfo {
    pub name: String,
    /// Agency inbox; empty disables contact notifications.
    pub inbox_email: String,
}

impl From<&SiteConfig> for SiteInfo {
    fn from(cfg: &SiteConfig) -> Self {
        Self { name: cfg.name.clone(), inbox_email: cfg.inbox_email.clone() }
    }
}

/// Current time in the column type used by every timestamp.
pub(crate) fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().fixed_offset()
}

/// Slot after the highest existing position, 0 when there is none.
pub(crate) fn next_position(positions: impl Iterator<Item = i32>) -> Result<i32, ServiceError> {
    match positions.max() {
        None => Ok(0),
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| ServiceError::Validation("no position left after the last item; set one explicitly".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_position_appends_and_refuses_to_overflow() {
        assert_eq!(next_position(std::iter::empty()).unwrap(), 0);
        assert_eq!(next_position([3, 0, 7].into_iter()).unwrap(), 8);
        assert!(matches!(next_position([i32::MAX].into_iter()), Err(ServiceError::Validation(_))));
    }
}
