use async_trait::async_trait;
use models::{blog_post, comment};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::seaorm::seaorm_crud;
use crate::storage::{CrudRepository, MemoryTable};

#[async_trait]
pub trait PostRepository: CrudRepository<blog_post::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<blog_post::Model>, ServiceError>;
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;
}

#[async_trait]
pub trait CommentRepository: CrudRepository<comment::Model> {
    /// Comments of one post, oldest first.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<comment::Model>, ServiceError>;
}

pub struct SeaOrmPostRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmPostRepository, blog_post);

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<blog_post::Model>, ServiceError> {
        Ok(blog_post::Entity::find().filter(blog_post::Column::Slug.eq(slug)).one(&self.db).await?)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let rows = blog_post::Entity::find().filter(blog_post::Column::Slug.starts_with(prefix)).all(&self.db).await?;
        Ok(rows.into_iter().map(|p| p.slug).collect())
    }
}

pub struct SeaOrmCommentRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmCommentRepository, comment);

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<comment::Model>, ServiceError> {
        Ok(comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[async_trait]
impl PostRepository for MemoryTable<blog_post::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<blog_post::Model>, ServiceError> {
        Ok(self.find_one(|p| p.slug == slug).await)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.find_all(|p| p.slug.starts_with(prefix)).await.into_iter().map(|p| p.slug).collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryTable<comment::Model> {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<comment::Model>, ServiceError> {
        let mut rows = self.find_all(|c| c.post_id == post_id).await;
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }
}
