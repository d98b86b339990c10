use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::utils::filter::matches_query;
use common::utils::sorting::SortOrder;
use models::contact_message::{self, ContactStatus};
use models::contact_reply::{self, Author};
use models::validate;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{ContactFilter, ContactInput, ThreadMessage};
use super::repository::{ContactRepository, ReplyRepository};
use crate::errors::ServiceError;
use crate::integrations::{templates, Mailer};
use crate::listing::ListQuery;
use crate::pagination::Page;
use crate::SiteInfo;

/// Contact form submissions and the admin inbox built on top of them.
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
    replies: Arc<dyn ReplyRepository>,
    mailer: Arc<dyn Mailer>,
    site: SiteInfo,
}

impl ContactService {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        replies: Arc<dyn ReplyRepository>,
        mailer: Arc<dyn Mailer>,
        site: SiteInfo,
    ) -> Self {
        Self { contacts, replies, mailer, site }
    }

    /// Store a visitor's message and notify the agency inbox. A failed
    /// notification does not fail the submission.
    #[instrument(skip(self, input))]
    pub async fn submit(&self, input: ContactInput) -> Result<contact_message::Model, ServiceError> {
        let now = crate::now();
        let model = contact_message::Model {
            id: Uuid::new_v4(),
            name: validate::required("name", &input.name, 128)?,
            email: validate::email("email", &input.email)?,
            phone: contact_message::validate_phone(input.phone.as_deref())?,
            subject: validate::optional("subject", input.subject.as_deref(), 200)?,
            message: contact_message::validate_message(&input.message)?,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        };
        let saved = self.contacts.insert(model).await?;
        info!(contact_id = %saved.id, "contact message received");

        if !self.site.inbox_email.is_empty() {
            let email = templates::contact_notification(&self.site.name, &self.site.inbox_email, &saved);
            if let Err(e) = self.mailer.send(&email).await {
                warn!(contact_id = %saved.id, error = %e, "inbox notification failed");
            }
        }
        Ok(saved)
    }

    pub async fn list(&self, query: &ListQuery, filter: &ContactFilter) -> Result<Page<contact_message::Model>, ServiceError> {
        let rows = self.contacts.list().await?;
        query.apply(rows, ("created_at", SortOrder::Desc), |c| {
            filter.status.map_or(true, |s| c.status == s)
                && matches_query(
                    [c.name.as_str(), c.email.as_str(), c.subject.as_deref().unwrap_or(""), c.message.as_str()],
                    query.search(),
                )
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<contact_message::Model, ServiceError> {
        self.contacts.get(id).await?.ok_or_else(|| ServiceError::not_found("contact"))
    }

    /// Admin opens a message: a `new` message becomes `read`.
    pub async fn open(&self, id: Uuid) -> Result<contact_message::Model, ServiceError> {
        let c = self.get(id).await?;
        if c.status != ContactStatus::New {
            return Ok(c);
        }
        self.set_status(id, ContactStatus::Read).await
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: Uuid, status: ContactStatus) -> Result<contact_message::Model, ServiceError> {
        let mut c = self.get(id).await?;
        c.status = status;
        c.updated_at = crate::now();
        self.contacts.update(c).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.contacts.delete(id).await? {
            return Err(ServiceError::not_found("contact"));
        }
        Ok(())
    }

    /// The conversation: the original message followed by every reply,
    /// oldest first. With `since`, only messages strictly newer than it.
    pub async fn thread(&self, id: Uuid, since: Option<DateTime<Utc>>) -> Result<Vec<ThreadMessage>, ServiceError> {
        let c = self.get(id).await?;
        let first = ThreadMessage { id: c.id, author: Author::Visitor, body: c.message, created_at: c.created_at };
        let replies = self.replies.list_by_contact(id).await?.into_iter().map(|r| ThreadMessage {
            id: r.id,
            author: r.author,
            body: r.body,
            created_at: r.created_at,
        });
        Ok(std::iter::once(first)
            .chain(replies)
            .filter(|m| since.map_or(true, |s| m.created_at > s))
            .collect())
    }

    /// Email the visitor, then record the reply and mark the contact
    /// `replied`. Nothing is recorded when the email fails.
    #[instrument(skip(self, body))]
    pub async fn reply(&self, id: Uuid, body: &str) -> Result<ThreadMessage, ServiceError> {
        let contact = self.get(id).await?;
        let body = validate::required("body", body, contact_message::MAX_MESSAGE_LEN)?;

        let email = templates::contact_reply(&self.site.name, Some(&self.site.inbox_email), &contact, &body);
        self.mailer.send(&email).await?;

        let reply = contact_reply::Model {
            id: Uuid::new_v4(),
            contact_id: id,
            author: Author::Admin,
            body,
            created_at: crate::now(),
        };
        let saved = self.replies.insert(reply).await?;
        self.set_status(id, ContactStatus::Replied).await?;
        info!(contact_id = %id, reply_id = %saved.id, "contact replied");
        Ok(ThreadMessage { id: saved.id, author: saved.author, body: saved.body, created_at: saved.created_at })
    }
}
