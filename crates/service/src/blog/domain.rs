use models::comment::CommentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub slug: Option<String>,
    /// Cut from `content` when omitted.
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicPostQuery {
    pub tag: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentInput {
    pub author_name: String,
    pub author_email: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFilter {
    pub status: Option<CommentStatus>,
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moderation {
    pub status: CommentStatus,
}
