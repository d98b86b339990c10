//! Generic SeaORM row operations used by the per-entity repositories.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
};
use uuid::Uuid;

use crate::errors::ServiceError;

pub async fn find_all<E>(db: &DatabaseConnection) -> Result<Vec<E::Model>, ServiceError>
where
    E: EntityTrait,
{
    Ok(E::find().all(db).await?)
}

pub async fn find_by_id<E>(db: &DatabaseConnection, id: Uuid) -> Result<Option<E::Model>, ServiceError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    Ok(E::find_by_id(id).one(db).await?)
}

/// Insert every column of `model`.
pub async fn insert<E, A>(db: &DatabaseConnection, model: E::Model) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    Ok(model.into_active_model().reset_all().insert(db).await?)
}

/// Overwrite every column of the row with `model`'s primary key.
pub async fn update<E, A>(db: &DatabaseConnection, model: E::Model) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    Ok(model.into_active_model().reset_all().update(db).await?)
}

pub async fn delete_by_id<E>(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let res = E::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Implements [`super::CrudRepository`] for a repository struct with a `db`
/// field by delegating to the helpers above.
macro_rules! seaorm_crud {
    ($repo:ty, $module:ident) => {
        #[async_trait::async_trait]
        impl $crate::storage::CrudRepository<models::$module::Model> for $repo {
            async fn list(&self) -> Result<Vec<models::$module::Model>, $crate::errors::ServiceError> {
                $crate::storage::seaorm::find_all::<models::$module::Entity>(&self.db).await
            }

            async fn get(&self, id: uuid::Uuid) -> Result<Option<models::$module::Model>, $crate::errors::ServiceError> {
                $crate::storage::seaorm::find_by_id::<models::$module::Entity>(&self.db, id).await
            }

            async fn insert(&self, model: models::$module::Model) -> Result<models::$module::Model, $crate::errors::ServiceError> {
                $crate::storage::seaorm::insert::<models::$module::Entity, models::$module::ActiveModel>(&self.db, model).await
            }

            async fn update(&self, model: models::$module::Model) -> Result<models::$module::Model, $crate::errors::ServiceError> {
                $crate::storage::seaorm::update::<models::$module::Entity, models::$module::ActiveModel>(&self.db, model).await
            }

            async fn delete(&self, id: uuid::Uuid) -> Result<bool, $crate::errors::ServiceError> {
                $crate::storage::seaorm::delete_by_id::<models::$module::Entity>(&self.db, id).await
            }
        }
    };
}

pub(crate) use seaorm_crud;
