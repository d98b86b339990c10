//! Storage abstractions for service layer
//!
//! Every entity repository extends [`CrudRepository`]. Two backends exist:
//! SeaORM over Postgres, and an in-memory table used by tests and by the
//! router tests in the server crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

pub use memory::{Keyed, MemoryTable};

/// Basic row operations shared by every entity repository.
#[async_trait]
pub trait CrudRepository<M>: Send + Sync {
    async fn list(&self) -> Result<Vec<M>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<M>, ServiceError>;
    async fn insert(&self, model: M) -> Result<M, ServiceError>;
    /// Replace the stored row with the same id.
    async fn update(&self, model: M) -> Result<M, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
