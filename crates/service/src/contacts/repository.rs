use async_trait::async_trait;
use models::{contact_message, contact_reply};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::seaorm::seaorm_crud;
use crate::storage::{CrudRepository, MemoryTable};

pub trait ContactRepository: CrudRepository<contact_message::Model> {}

#[async_trait]
pub trait ReplyRepository: CrudRepository<contact_reply::Model> {
    /// Replies of one contact, oldest first.
    async fn list_by_contact(&self, contact_id: Uuid) -> Result<Vec<contact_reply::Model>, ServiceError>;
}

pub struct SeaOrmContactRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmContactRepository, contact_message);

impl ContactRepository for SeaOrmContactRepository {}

pub struct SeaOrmReplyRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmReplyRepository, contact_reply);

#[async_trait]
impl ReplyRepository for SeaOrmReplyRepository {
    async fn list_by_contact(&self, contact_id: Uuid) -> Result<Vec<contact_reply::Model>, ServiceError> {
        Ok(contact_reply::Entity::find()
            .filter(contact_reply::Column::ContactId.eq(contact_id))
            .order_by_asc(contact_reply::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

impl ContactRepository for MemoryTable<contact_message::Model> {}

#[async_trait]
impl ReplyRepository for MemoryTable<contact_reply::Model> {
    async fn list_by_contact(&self, contact_id: Uuid) -> Result<Vec<contact_reply::Model>, ServiceError> {
        let mut rows = self.find_all(|r| r.contact_id == contact_id).await;
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }
}
