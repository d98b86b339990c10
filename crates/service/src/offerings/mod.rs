//! Agency service offerings shown on the marketing site.

use std::sync::Arc;

use async_trait::async_trait;
use common::utils::filter::matches_query;
use common::utils::slug::slugify;
use common::utils::sorting::{stable_sort, SortOrder};
use models::{service_offering, validate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::errors::ServiceError;
use crate::listing::ListQuery;
use crate::pagination::Page;
use crate::slugs::pick_slug;
use crate::storage::seaorm::seaorm_crud;
use crate::storage::{CrudRepository, MemoryTable};

#[async_trait]
pub trait OfferingRepository: CrudRepository<service_offering::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<service_offering::Model>, ServiceError>;
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;
}

pub struct SeaOrmOfferingRepository {
    pub db: DatabaseConnection,
}

seaorm_crud!(SeaOrmOfferingRepository, service_offering);

#[async_trait]
impl OfferingRepository for SeaOrmOfferingRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<service_offering::Model>, ServiceError> {
        Ok(service_offering::Entity::find()
            .filter(service_offering::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let rows = service_offering::Entity::find()
            .filter(service_offering::Column::Slug.starts_with(prefix))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|s| s.slug).collect())
    }
}

#[async_trait]
impl OfferingRepository for MemoryTable<service_offering::Model> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<service_offering::Model>, ServiceError> {
        Ok(self.find_one(|s| s.slug == slug).await)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.find_all(|s| s.slug.starts_with(prefix)).await.into_iter().map(|s| s.slug).collect())
    }
}

fn yes() -> bool { true }

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferingInput {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
    pub price_from: Option<i32>,
    /// Appended after the last offering when omitted.
    pub position: Option<i32>,
    #[serde(default = "yes")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferingPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub price_from: Option<i32>,
    pub position: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingFilter {
    pub active: Option<bool>,
}

pub struct OfferingService {
    repo: Arc<dyn OfferingRepository>,
    active: ListingCache<Vec<service_offering::Model>>,
}

impl OfferingService {
    pub fn new(repo: Arc<dyn OfferingRepository>, active: ListingCache<Vec<service_offering::Model>>) -> Self {
        Self { repo, active }
    }

    pub async fn list(&self, query: &ListQuery, filter: &OfferingFilter) -> Result<Page<service_offering::Model>, ServiceError> {
        let rows = self.repo.list().await?;
        query.apply(rows, ("position", SortOrder::Asc), |s| {
            filter.active.map_or(true, |v| s.active == v)
                && matches_query([s.title.as_str(), s.summary.as_str()], query.search())
        })
    }

    /// Active offerings by display position.
    pub async fn list_public(&self) -> Result<Vec<service_offering::Model>, ServiceError> {
        let rows = self
            .active
            .get_or_try_load("active", || async {
                let rows: Vec<_> = self.repo.list().await?.into_iter().filter(|s| s.active).collect();
                let by_title = stable_sort(rows, "title", SortOrder::Asc)?;
                stable_sort(by_title, "position", SortOrder::Asc).map_err(ServiceError::from)
            })
            .await?;
        Ok(rows.as_ref().clone())
    }

    pub async fn get(&self, id: Uuid) -> Result<service_offering::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("service"))
    }

    pub async fn get_public(&self, slug: &str) -> Result<service_offering::Model, ServiceError> {
        match self.repo.find_by_slug(slug).await? {
            Some(s) if s.active => Ok(s),
            _ => Err(ServiceError::not_found("service")),
        }
    }

    async fn taken_slugs(&self, base: &str, except: Option<&str>) -> Result<Vec<String>, ServiceError> {
        let mut taken = self.repo.slugs_with_prefix(base).await?;
        if let Some(own) = except {
            taken.retain(|s| s != own);
        }
        Ok(taken)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: OfferingInput) -> Result<service_offering::Model, ServiceError> {
        let title = service_offering::validate_title(&input.title)?;
        let base = slugify(input.slug.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(&title))?;
        let slug = pick_slug(input.slug.as_deref(), &title, &self.taken_slugs(&base, None).await?)?;
        let position = match input.position {
            Some(p) if p < 0 => return Err(ServiceError::Validation("position must be >= 0".into())),
            Some(p) => p,
            None => crate::next_position(self.repo.list().await?.iter().map(|s| s.position))?,
        };
        let now = crate::now();
        let model = service_offering::Model {
            id: Uuid::new_v4(),
            title,
            slug,
            summary: validate::bounded("summary", &input.summary, 500)?,
            description: validate::bounded("description", &input.description, 20_000)?,
            icon: validate::optional("icon", input.icon.as_deref(), 64)?,
            price_from: service_offering::validate_price(input.price_from)?,
            position,
            active: input.active,
            created_at: now,
            updated_at: now,
        };
        let saved = self.repo.insert(model).await?;
        self.active.invalidate_all();
        info!(service_id = %saved.id, slug = %saved.slug, "service offering created");
        Ok(saved)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: OfferingPatch) -> Result<service_offering::Model, ServiceError> {
        let mut s = self.get(id).await?;
        if let Some(t) = patch.title.as_deref() {
            s.title = service_offering::validate_title(t)?;
        }
        if let Some(raw) = patch.slug.as_deref().filter(|v| !v.trim().is_empty()) {
            let wanted = slugify(raw)?;
            if wanted != s.slug {
                s.slug = pick_slug(Some(&wanted), &s.title, &self.taken_slugs(&wanted, Some(&s.slug)).await?)?;
            }
        }
        if let Some(v) = patch.summary.as_deref() {
            s.summary = validate::bounded("summary", v, 500)?;
        }
        if let Some(v) = patch.description.as_deref() {
            s.description = validate::bounded("description", v, 20_000)?;
        }
        if let Some(v) = patch.icon.as_deref() {
            s.icon = validate::optional("icon", Some(v), 64)?;
        }
        if patch.price_from.is_some() {
            s.price_from = service_offering::validate_price(patch.price_from)?;
        }
        if let Some(p) = patch.position {
            if p < 0 {
                return Err(ServiceError::Validation("position must be >= 0".into()));
            }
            s.position = p;
        }
        if let Some(v) = patch.active {
            s.active = v;
        }
        s.updated_at = crate::now();
        let saved = self.repo.update(s).await?;
        self.active.invalidate_all();
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("service"));
        }
        self.active.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> OfferingService {
        OfferingService::new(Arc::new(MemoryTable::<service_offering::Model>::new()), ListingCache::default())
    }

    fn input(title: &str, position: Option<i32>) -> OfferingInput {
        OfferingInput { title: title.into(), position, active: true, ..Default::default() }
    }

    #[tokio::test]
    async fn public_list_is_ordered_by_position_and_refreshed_on_write() -> Result<(), anyhow::Error> {
        let svc = service();
        svc.create(input("Branding", Some(2))).await?;
        let web = svc.create(input("Web design", Some(1))).await?;
        svc.create(OfferingInput { active: false, ..input("Retired", Some(0)) }).await?;

        let titles: Vec<_> = svc.list_public().await?.into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Web design", "Branding"]);

        svc.update(web.id, OfferingPatch { position: Some(5), ..Default::default() }).await?;
        let titles: Vec<_> = svc.list_public().await?.into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Branding", "Web design"]);
        Ok(())
    }

    #[tokio::test]
    async fn position_defaults_to_end_and_rejects_negative() -> Result<(), anyhow::Error> {
        let svc = service();
        assert_eq!(svc.create(input("A", None)).await?.position, 0);
        assert_eq!(svc.create(input("B", None)).await?.position, 1);
        assert!(svc.create(input("C", Some(-1))).await.is_err());
        assert!(svc.create(OfferingInput { price_from: Some(-5), ..input("D", None) }).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn offering_after_max_position_is_rejected() -> Result<(), anyhow::Error> {
        let svc = service();
        assert_eq!(svc.create(input("Last", Some(i32::MAX))).await?.position, i32::MAX);
        assert!(matches!(svc.create(input("After", None)).await, Err(ServiceError::Validation(_))));
        assert_eq!(svc.list_public().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn inactive_offering_is_not_public() -> Result<(), anyhow::Error> {
        let svc = service();
        let s = svc.create(input("Illustration", None)).await?;
        assert!(svc.get_public("illustration").await.is_ok());
        svc.update(s.id, OfferingPatch { active: Some(false), ..Default::default() }).await?;
        assert!(matches!(svc.get_public("illustration").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
