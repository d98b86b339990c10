use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use common::utils::sorting::{SortValue, Sortable};
use crate::{contact_reply, errors::ModelError, validate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "read")]
    Read,
    #[sea_orm(string_value = "replied")]
    Replied,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Reply }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Reply => Entity::has_many(contact_reply::Entity).into(),
        }
    }
}

impl Related<contact_reply::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reply.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Sortable for Model {
    const SORT_FIELDS: &'static [&'static str] = &["name", "email", "subject", "status", "created_at", "updated_at"];

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::text(&self.name),
            "email" => SortValue::text(&self.email),
            "subject" => SortValue::opt_text(self.subject.as_deref()),
            "status" => SortValue::text(self.status.as_str()),
            "created_at" => SortValue::time(&self.created_at),
            "updated_at" => SortValue::time(&self.updated_at),
            _ => SortValue::Null,
        }
    }
}

pub const MAX_MESSAGE_LEN: usize = 5000;

pub fn validate_message(m: &str) -> Result<String, ModelError> {
    validate::required("message", m, MAX_MESSAGE_LEN)
}

pub fn validate_phone(p: Option<&str>) -> Result<Option<String>, ModelError> {
    let phone = validate::optional("phone", p, 32)?;
    if let Some(ref v) = phone {
        let ok = v.chars().all(|c| c.is_ascii_digit() || " +-().".contains(c));
        if !ok || v.chars().filter(char::is_ascii_digit).count() < 6 {
            return Err(ModelError::Validation("phone must be a phone number".into()));
        }
    }
    Ok(phone)
}
