use async_trait::async_trait;
use models::{artist, artwork};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::seaorm::seaorm_crud;
use crate::storage::{CrudRepository, MemoryTable};

#[async_trait]
pub trait ArtistRepository: CrudRepository<artist::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<artist::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<artist::Model>, ServiceError>;
    /// Slugs equal to or starting with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;
}

#[async_trait]
pub trait ArtworkRepository: CrudRepository<artwork::Model> {
    async fn list_by_artist(&self, artist_id: Uuid) -> Result<Vec<artwork::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmArtistRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmArtistRepository, artist);

#[async_trait]
impl ArtistRepository for SeaOrmArtistRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<artist::Model>, ServiceError> {
        Ok(artist::Entity::find().filter(artist::Column::Slug.eq(slug)).one(&self.db).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<artist::Model>, ServiceError> {
        Ok(artist::Entity::find().filter(artist::Column::Email.eq(email)).one(&self.db).await?)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let rows = artist::Entity::find().filter(artist::Column::Slug.starts_with(prefix)).all(&self.db).await?;
        Ok(rows.into_iter().map(|a| a.slug).collect())
    }
}

pub struct SeaOrmArtworkRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmArtworkRepository, artwork);

#[async_trait]
impl ArtworkRepository for SeaOrmArtworkRepository {
    async fn list_by_artist(&self, artist_id: Uuid) -> Result<Vec<artwork::Model>, ServiceError> {
        Ok(artwork::Entity::find()
            .filter(artwork::Column::ArtistId.eq(artist_id))
            .order_by_asc(artwork::Column::Position)
            .order_by_asc(artwork::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[async_trait]
impl ArtistRepository for MemoryTable<artist::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<artist::Model>, ServiceError> {
        Ok(self.find_one(|a| a.slug == slug).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<artist::Model>, ServiceError> {
        Ok(self.find_one(|a| a.email == email).await)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.find_all(|a| a.slug.starts_with(prefix)).await.into_iter().map(|a| a.slug).collect())
    }
}

#[async_trait]
impl ArtworkRepository for MemoryTable<artwork::Model> {
    async fn list_by_artist(&self, artist_id: Uuid) -> Result<Vec<artwork::Model>, ServiceError> {
        let mut rows = self.find_all(|w| w.artist_id == artist_id).await;
        rows.sort_by(artwork::gallery_order);
        Ok(rows)
    }
}
