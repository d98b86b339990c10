use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{blog_post, errors::ModelError, validate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub status: CommentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Post }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Post => Entity::belongs_to(blog_post::Entity)
                .from(Column::PostId)
                .to(blog_post::Column::Id)
                .into(),
        }
    }
}

impl Related<blog_post::Entity> for Entity {
    fn to() -> RelationDef { Relation::Post.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] = &["author_name", "author_email", "status", "created_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "author_name" => SortValue::text(&self.author_name),
            "author_email" => SortValue::text(&self.author_email),
            "status" => SortValue::text(self.status.as_str()),
            "created_at" => SortValue::time(&self.created_at),
            _ => SortValue::Null,
        }
    }
}

pub fn validate_body(b: &str) -> Result<String, ModelError> {
    validate::required("body", b, 2000)
}
