use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{artist, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artwork")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub artist_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image_url: String,
    /// Gallery order, lowest first.
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
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

pub fn validate_title(t: &str) -> Result<String, ModelError> {
    validate::required("title", t, 200)
}

pub fn validate_position(p: i32) -> Result<i32, ModelError> {
    if p < 0 {
        return Err(ModelError::Validation("position must be >= 0".into()));
    }
    Ok(p)
}

/// Gallery order: position, then upload time.
pub fn gallery_order(a: &Model, b: &Model) -> std::cmp::Ordering {
    a.position.cmp(&b.position).then_with(|| a.created_at.cmp(&b.created_at))
}
