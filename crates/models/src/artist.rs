use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{artwork, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(unique)]
    pub email: String,
    pub discipline: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    /// Map of network name to profile URL.
    pub social_links: Json,
    pub featured: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Artwork }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Artwork => Entity::has_many(artwork::Entity).into(),
        }
    }
}

impl Related<artwork::Entity> for Entity {
    fn to() -> RelationDef { Relation::Artwork.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] =
        &["name", "email", "discipline", "featured", "active", "created_at", "updated_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "email" => SortValue::text(&self.email),
            "discipline" => SortValue::text(&self.discipline),
            "featured" => SortValue::Bool(self.featured),
            "active" => SortValue::Bool(self.active),
            "created_at" => SortValue::time(&self.created_at),
            "updated_at" => SortValue::time(&self.updated_at),
            _ => SortValue::Null,
        }
    }
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    validate::required("name", name, 128)
}

pub fn validate_discipline(d: &str) -> Result<String, ModelError> {
    validate::bounded("discipline", d, 64)
}

pub fn validate_bio(bio: &str) -> Result<String, ModelError> {
    validate::bounded("bio", bio, 10_000)
}

/// Social links must be a JSON object whose values are http(s) URLs.
pub fn validate_social_links(links: &Json) -> Result<Json, ModelError> {
    let Some(map) = links.as_object() else {
        if links.is_null() {
            return Ok(Json::Object(Default::default()));
        }
        return Err(ModelError::Validation("social_links must be an object".into()));
    };
    for (network, url) in map {
        let Some(url) = url.as_str() else {
            return Err(ModelError::Validation(format!("social_links.{network} must be a string")));
        };
        validate::url(&format!("social_links.{network}"), url)?;
    }
    Ok(links.clone())
}
