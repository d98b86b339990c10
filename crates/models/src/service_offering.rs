use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_offering")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: Option<String>,
    /// Starting price in whole currency units.
    pub price_from: Option<i32>,
    pub position: i32,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] = &["title", "position", "price_from", "active", "created_at", "updated_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "position" => SortValue::Int(self.position as i64),
            "price_from" => self.price_from.map(|p| SortValue::Int(p as i64)).unwrap_or(SortValue::Null),
            "active" => SortValue::Bool(self.active),
            "created_at" => SortValue::time(&self.created_at),
            "updated_at" => SortValue::time(&self.updated_at),
            _ => SortValue::Null,
        }
    }
}

pub fn validate_title(t: &str) -> Result<String, ModelError> {
    validate::required("title", t, 128)
}

pub fn validate_price(p: Option<i32>) -> Result<Option<i32>, ModelError> {
    match p {
        Some(v) if v < 0 => Err(ModelError::Validation("price_from must be >= 0".into())),
        other => Ok(other),
    }
}
