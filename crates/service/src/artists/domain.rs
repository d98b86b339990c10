use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

fn yes() -> bool { true }

/// New artist as submitted by the admin form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistInput {
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub email: String,
    #[serde(default)]
    pub discipline: String,
    #[serde(default)]
    pub bio: String,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub social_links: Value,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "yes")]
    pub active: bool,
}

/// Partial update; absent fields are kept, blank optional URLs are cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub discipline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<Value>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistFilter {
    pub active: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicArtistQuery {
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlugCheck {
    pub slug: String,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailCheck {
    pub email: String,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    /// Appended after the last piece when omitted.
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtworkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
