use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CrudRepository;
use crate::errors::ServiceError;

/// Rows with a primary key.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

macro_rules! keyed {
    ($($m:path),* $(,)?) => {
        $(impl Keyed for $m { fn key(&self) -> Uuid { self.id } })*
    };
}

keyed!(
    models::artist::Model,
    models::artwork::Model,
    models::contact_message::Model,
    models::contact_reply::Model,
    models::feedback::Model,
    models::blog_post::Model,
    models::comment::Model,
    models::service_offering::Model,
    models::meeting::Model,
);

/// In-memory table keeping insertion order.
///
/// Clones share the same rows, so a test can hold one handle while a
/// service owns another.
#[derive(Clone)]
pub struct MemoryTable<V> {
    rows: Arc<RwLock<Vec<V>>>,
}

impl<V> Default for MemoryTable<V> {
    fn default() -> Self {
        Self { rows: Arc::new(RwLock::new(Vec::new())) }
    }
}

impl<V> MemoryTable<V>
where
    V: Keyed + Clone + Send + Sync,
{
    pub fn new() -> Self { Self::default() }

    /// Rows matching `pred`, in insertion order.
    pub async fn find_all<F>(&self, pred: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let rows = self.rows.read().await;
        rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    pub async fn find_one<F>(&self, pred: F) -> Option<V>
    where
        F: Fn(&V) -> bool,
    {
        let rows = self.rows.read().await;
        rows.iter().find(|r| pred(r)).cloned()
    }

    /// Remove every row matching `pred`; returns how many went.
    pub async fn remove_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&V) -> bool,
    {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !pred(r));
        before - rows.len()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<V> CrudRepository<V> for MemoryTable<V>
where
    V: Keyed + Clone + Send + Sync + 'static,
{
    async fn list(&self) -> Result<Vec<V>, ServiceError> {
        Ok(self.rows.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<V>, ServiceError> {
        Ok(self.find_one(|r| r.key() == id).await)
    }

    async fn insert(&self, model: V) -> Result<V, ServiceError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.key() == model.key()) {
            return Err(ServiceError::Conflict(format!("duplicate key {}", model.key())));
        }
        rows.push(model.clone());
        Ok(model)
    }

    async fn update(&self, model: V) -> Result<V, ServiceError> {
        let mut rows = self.rows.write().await;
        let Some(slot) = rows.iter_mut().find(|r| r.key() == model.key()) else {
            return Err(ServiceError::NotFound(format!("row {} not found", model.key())));
        };
        *slot = model.clone();
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.remove_where(|r| r.key() == id).await > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: Uuid,
        text: &'static str,
    }

    impl Keyed for Note {
        fn key(&self) -> Uuid { self.id }
    }

    #[tokio::test]
    async fn memory_table_crud_keeps_order() -> Result<(), anyhow::Error> {
        let table = MemoryTable::<Note>::new();
        let a = Note { id: Uuid::new_v4(), text: "a" };
        let b = Note { id: Uuid::new_v4(), text: "b" };
        table.insert(a.clone()).await?;
        table.insert(b.clone()).await?;
        assert!(matches!(table.insert(a.clone()).await, Err(ServiceError::Conflict(_))));

        table.update(Note { text: "a2", ..a.clone() }).await?;
        let texts: Vec<_> = table.list().await?.into_iter().map(|n| n.text).collect();
        assert_eq!(texts, ["a2", "b"]);

        assert!(table.delete(b.id).await?);
        assert!(!table.delete(b.id).await?);
        assert_eq!(table.len().await, 1);

        let missing = Note { id: Uuid::new_v4(), text: "x" };
        assert!(matches!(table.update(missing).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_rows() {
        let table = MemoryTable::<Note>::new();
        let handle = table.clone();
        table.insert(Note { id: Uuid::new_v4(), text: "shared" }).await.unwrap();
        assert_eq!(handle.len().await, 1);
    }
}
