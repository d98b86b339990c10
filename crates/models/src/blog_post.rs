use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{comment, errors::ModelError, validate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author: String,
    /// JSON array of tag strings.
    pub tags: Json,
    pub published: bool,
    /// Set the first time the post goes live; kept when unpublished.
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Comment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Comment => Entity::has_many(comment::Entity).into(),
        }
    }
}

impl Related<comment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Comment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|a| a.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }
}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] =
        &["title", "author", "published", "published_at", "created_at", "updated_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "author" => SortValue::text(&self.author),
            "published" => SortValue::Bool(self.published),
            "published_at" => SortValue::opt_time(self.published_at.as_ref()),
            "created_at" => SortValue::time(&self.created_at),
            "updated_at" => SortValue::time(&self.updated_at),
            _ => SortValue::Null,
        }
    }
}

pub fn validate_title(t: &str) -> Result<String, ModelError> {
    validate::required("title", t, 200)
}

/// Trim, drop blanks and duplicates (case-insensitive), keep first spelling.
pub fn normalize_tags(tags: &[String]) -> Result<Json, ModelError> {
    let mut out: Vec<String> = Vec::new();
    for t in tags {
        let t = t.trim();
        if t.is_empty() {
            continue;
        }
        if t.chars().count() > 40 {
            return Err(ModelError::Validation("tags must be at most 40 characters".into()));
        }
        if !out.iter().any(|x| x.eq_ignore_ascii_case(t)) {
            out.push(t.to_string());
        }
    }
    if out.len() > 20 {
        return Err(ModelError::Validation("at most 20 tags".into()));
    }
    Ok(Json::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_are_deduplicated() {
        let tags = vec![" Design ".to_string(), "design".into(), "".into(), "Print".into()];
        assert_eq!(normalize_tags(&tags).unwrap(), json!(["Design", "Print"]));
    }

    #[test]
    fn too_many_tags() {
        let tags: Vec<String> = (0..21).map(|i| format!("t{i}")).collect();
        assert!(normalize_tags(&tags).is_err());
    }
}
