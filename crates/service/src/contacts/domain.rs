use chrono::{DateTime, FixedOffset};
use models::contact_message::ContactStatus;
use models::contact_reply::Author;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyInput {
    pub body: String,
}

/// One bubble of the inbox conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadMessage {
    pub id: Uuid,
    pub author: Author,
    pub body: String,
    pub created_at: DateTime<FixedOffset>,
}
