//! Visitor feedback; approved entries double as public testimonials.

use std::sync::Arc;

use common::utils::filter::matches_query;
use common::utils::sorting::{stable_sort, SortOrder};
use models::{feedback, validate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::errors::ServiceError;
use crate::listing::ListQuery;
use crate::pagination::{Page, Pagination, DEFAULT_PER_PAGE};
use crate::storage::{CrudRepository, MemoryTable};
use crate::storage::seaorm::seaorm_crud;

pub trait FeedbackRepository: CrudRepository<feedback::Model> {}

pub struct SeaOrmFeedbackRepository {
    pub db: sea_orm::DatabaseConnection,
}

seaorm_crud!(SeaOrmFeedbackRepository, feedback);

impl FeedbackRepository for SeaOrmFeedbackRepository {}
impl FeedbackRepository for MemoryTable<feedback::Model> {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackInput {
    pub name: String,
    pub email: Option<String>,
    pub rating: i32,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFilter {
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalUpdate {
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub struct FeedbackService {
    repo: Arc<dyn FeedbackRepository>,
    testimonials: ListingCache<Vec<feedback::Model>>,
}

impl FeedbackService {
    pub fn new(repo: Arc<dyn FeedbackRepository>, testimonials: ListingCache<Vec<feedback::Model>>) -> Self {
        Self { repo, testimonials }
    }

    /// New feedback waits for approval before it is shown.
    #[instrument(skip(self, input))]
    pub async fn submit(&self, input: FeedbackInput) -> Result<feedback::Model, ServiceError> {
        let email = match input.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(e) => Some(validate::email("email", e)?),
            None => None,
        };
        let model = feedback::Model {
            id: Uuid::new_v4(),
            name: validate::required("name", &input.name, 128)?,
            email,
            rating: feedback::validate_rating(input.rating)?,
            message: feedback::validate_message(&input.message)?,
            approved: false,
            created_at: crate::now(),
        };
        let saved = self.repo.insert(model).await?;
        info!(feedback_id = %saved.id, rating = saved.rating, "feedback received");
        Ok(saved)
    }

    pub async fn list(&self, query: &ListQuery, filter: &FeedbackFilter) -> Result<Page<feedback::Model>, ServiceError> {
        let rows = self.repo.list().await?;
        query.apply(rows, ("created_at", SortOrder::Desc), |f| {
            filter.approved.map_or(true, |v| f.approved == v)
                && matches_query([f.name.as_str(), f.message.as_str(), f.email.as_deref().unwrap_or("")], query.search())
        })
    }

    /// Approved feedback, newest first.
    pub async fn testimonials(&self, query: &TestimonialQuery) -> Result<Page<feedback::Model>, ServiceError> {
        let all = self
            .testimonials
            .get_or_try_load("approved", || async {
                let approved: Vec<_> = self.repo.list().await?.into_iter().filter(|f| f.approved).collect();
                stable_sort(approved, "created_at", SortOrder::Desc).map_err(ServiceError::from)
            })
            .await?;
        Ok(Page::from_vec(all.as_ref().clone(), Pagination::new(query.page, query.per_page, DEFAULT_PER_PAGE)))
    }

    #[instrument(skip(self))]
    pub async fn set_approved(&self, id: Uuid, approved: bool) -> Result<feedback::Model, ServiceError> {
        let mut f = self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("feedback"))?;
        f.approved = approved;
        let saved = self.repo.update(f).await?;
        self.testimonials.invalidate_all();
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("feedback"));
        }
        self.testimonials.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FeedbackService {
        FeedbackService::new(Arc::new(MemoryTable::<feedback::Model>::new()), ListingCache::default())
    }

    fn input(rating: i32) -> FeedbackInput {
        FeedbackInput { name: "Ada".into(), rating, message: "Lovely work".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn rating_must_be_one_to_five() {
        let svc = service();
        assert!(svc.submit(input(0)).await.is_err());
        assert!(svc.submit(input(6)).await.is_err());
        assert!(svc.submit(input(5)).await.is_ok());
    }

    #[tokio::test]
    async fn blank_email_is_dropped_bad_email_rejected() -> Result<(), anyhow::Error> {
        let svc = service();
        let saved = svc.submit(FeedbackInput { email: Some("  ".into()), ..input(4) }).await?;
        assert_eq!(saved.email, None);
        assert!(svc.submit(FeedbackInput { email: Some("nope".into()), ..input(4) }).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn only_approved_feedback_is_public_and_cache_is_refreshed() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.submit(input(5)).await?;
        svc.submit(input(3)).await?;
        assert_eq!(svc.testimonials(&TestimonialQuery::default()).await?.total, 0);

        svc.set_approved(a.id, true).await?;
        let public = svc.testimonials(&TestimonialQuery::default()).await?;
        assert_eq!(public.total, 1);
        assert_eq!(public.items[0].id, a.id);

        svc.delete(a.id).await?;
        assert_eq!(svc.testimonials(&TestimonialQuery::default()).await?.total, 0);
        Ok(())
    }

    #[tokio::test]
    async fn admin_list_filters_by_approval() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.submit(input(5)).await?;
        svc.submit(input(2)).await?;
        svc.set_approved(a.id, true).await?;
        let pending = svc.list(&ListQuery::default(), &FeedbackFilter { approved: Some(false) }).await?;
        assert_eq!(pending.total, 1);
        assert_eq!(pending.items[0].rating, 2);
        Ok(())
    }
}
