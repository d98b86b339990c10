use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::contact_message;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Author {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "visitor")]
    Visitor,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_reply")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub author: Author,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Contact }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Contact => Entity::belongs_to(contact_message::Entity)
                .from(Column::ContactId)
                .to(contact_message::Column::Id)
                .into(),
        }
    }
}

impl Related<contact_message::Entity> for Entity {
    fn to() -> RelationDef { Relation::Contact.def() }
}

impl ActiveModelBehavior for ActiveModel {}
