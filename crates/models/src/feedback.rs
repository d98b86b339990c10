use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// 1..=5 stars
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// Approved feedback is published as a testimonial.
    pub approved: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] = &["name", "rating", "approved", "created_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "rating" => SortValue::Int(self.rating as i64),
            "approved" => SortValue::Bool(self.approved),
            "created_at" => SortValue::time(&self.created_at),
            _ => SortValue::Null,
        }
    }
}

pub fn validate_rating(r: i32) -> Result<i32, ModelError> {
    if !(1..=5).contains(&r) {
        return Err(ModelError::Validation("rating must be between 1 and 5".into()));
    }
    Ok(r)
}

pub fn validate_message(m: &str) -> Result<String, ModelError> {
    validate::required("message", m, 2000)
}
