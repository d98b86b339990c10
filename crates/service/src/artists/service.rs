use std::sync::Arc;

use common::types::Availability;
use common::utils::filter::matches_query;
use common::utils::slug::slugify;
use common::utils::sorting::{stable_sort, SortOrder};
use models::{artist, artwork, validate};
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{ArtistFilter, ArtistInput, ArtistPatch, ArtworkInput, ArtworkPatch, PublicArtistQuery};
use super::repository::{ArtistRepository, ArtworkRepository};
use crate::errors::ServiceError;
use crate::listing::ListQuery;
use crate::pagination::{Page, Pagination, DEFAULT_PER_PAGE, GALLERY_PER_PAGE};
use crate::slugs::{availability, pick_slug};

/// Artist profiles and their portfolio galleries.
pub struct ArtistService {
    artists: Arc<dyn ArtistRepository>,
    artworks: Arc<dyn ArtworkRepository>,
}

impl ArtistService {
    pub fn new(artists: Arc<dyn ArtistRepository>, artworks: Arc<dyn ArtworkRepository>) -> Self {
        Self { artists, artworks }
    }

    pub async fn list(&self, query: &ListQuery, filter: &ArtistFilter) -> Result<Page<artist::Model>, ServiceError> {
        let rows = self.artists.list().await?;
        query.apply(rows, ("name", SortOrder::Asc), |a| {
            filter.active.map_or(true, |v| a.active == v)
                && filter.featured.map_or(true, |v| a.featured == v)
                && matches_query([a.name.as_str(), a.email.as_str(), a.discipline.as_str()], query.search())
        })
    }

    /// Active artists, featured first, then by name.
    pub async fn list_public(&self, query: &PublicArtistQuery) -> Result<Page<artist::Model>, ServiceError> {
        let rows: Vec<_> = self
            .artists
            .list()
            .await?
            .into_iter()
            .filter(|a| a.active && query.featured.map_or(true, |v| a.featured == v))
            .collect();
        let by_name = stable_sort(rows, "name", SortOrder::Asc)?;
        let sorted = stable_sort(by_name, "featured", SortOrder::Desc)?;
        Ok(Page::from_vec(sorted, Pagination::new(query.page, query.per_page, DEFAULT_PER_PAGE)))
    }

    pub async fn get(&self, id: Uuid) -> Result<artist::Model, ServiceError> {
        self.artists.get(id).await?.ok_or_else(|| ServiceError::not_found("artist"))
    }

    pub async fn get_public(&self, slug: &str) -> Result<artist::Model, ServiceError> {
        match self.artists.find_by_slug(slug).await? {
            Some(a) if a.active => Ok(a),
            _ => Err(ServiceError::not_found("artist")),
        }
    }

    async fn taken_slugs(&self, base: &str, except: Option<Uuid>) -> Result<Vec<String>, ServiceError> {
        let mut taken = self.artists.slugs_with_prefix(base).await?;
        if let Some(id) = except {
            if let Some(current) = self.artists.get(id).await? {
                taken.retain(|s| s != &current.slug);
            }
        }
        Ok(taken)
    }

    async fn ensure_email_free(&self, email: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        match self.artists.find_by_email(email).await? {
            Some(other) if Some(other.id) != except => {
                Err(ServiceError::Conflict(format!("email '{email}' is already used by another artist")))
            }
            _ => Ok(()),
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ArtistInput) -> Result<artist::Model, ServiceError> {
        let name = artist::validate_name(&input.name)?;
        let email = validate::email("email", &input.email)?;
        self.ensure_email_free(&email, None).await?;

        let base = slugify(input.slug.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(&name))?;
        let slug = pick_slug(input.slug.as_deref(), &name, &self.taken_slugs(&base, None).await?)?;

        let now = crate::now();
        let model = artist::Model {
            id: Uuid::new_v4(),
            name,
            slug,
            email,
            discipline: artist::validate_discipline(&input.discipline)?,
            bio: artist::validate_bio(&input.bio)?,
            avatar_url: validate::optional_url("avatar_url", input.avatar_url.as_deref())?,
            website: validate::optional_url("website", input.website.as_deref())?,
            social_links: artist::validate_social_links(&input.social_links)?,
            featured: input.featured,
            active: input.active,
            created_at: now,
            updated_at: now,
        };
        let created = self.artists.insert(model).await?;
        info!(artist_id = %created.id, slug = %created.slug, "artist created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: ArtistPatch) -> Result<artist::Model, ServiceError> {
        let mut a = self.get(id).await?;
        if let Some(name) = patch.name.as_deref() {
            a.name = artist::validate_name(name)?;
        }
        if let Some(raw) = patch.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            let wanted = slugify(raw)?;
            if wanted != a.slug {
                a.slug = pick_slug(Some(&wanted), &a.name, &self.taken_slugs(&wanted, Some(id)).await?)?;
            }
        }
        if let Some(email) = patch.email.as_deref() {
            let email = validate::email("email", email)?;
            self.ensure_email_free(&email, Some(id)).await?;
            a.email = email;
        }
        if let Some(d) = patch.discipline.as_deref() {
            a.discipline = artist::validate_discipline(d)?;
        }
        if let Some(bio) = patch.bio.as_deref() {
            a.bio = artist::validate_bio(bio)?;
        }
        if let Some(url) = patch.avatar_url.as_deref() {
            a.avatar_url = validate::optional_url("avatar_url", Some(url))?;
        }
        if let Some(url) = patch.website.as_deref() {
            a.website = validate::optional_url("website", Some(url))?;
        }
        if let Some(links) = patch.social_links.as_ref() {
            a.social_links = artist::validate_social_links(links)?;
        }
        if let Some(v) = patch.featured {
            a.featured = v;
        }
        if let Some(v) = patch.active {
            a.active = v;
        }
        a.updated_at = crate::now();
        self.artists.update(a).await
    }

    /// Artworks go with the artist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.artists.delete(id).await? {
            return Err(ServiceError::not_found("artist"));
        }
        info!(artist_id = %id, "artist deleted");
        Ok(())
    }

    pub async fn check_slug(&self, raw: &str, exclude_id: Option<Uuid>) -> Result<Availability, ServiceError> {
        let slug = slugify(raw)?;
        let owner = self.artists.find_by_slug(&slug).await?.map(|a| a.id);
        Ok(availability(slug, owner, exclude_id))
    }

    pub async fn check_email(&self, raw: &str, exclude_id: Option<Uuid>) -> Result<Availability, ServiceError> {
        let email = validate::email("email", raw)?;
        let owner = self.artists.find_by_email(&email).await?.map(|a| a.id);
        Ok(Availability { available: owner.map_or(true, |id| Some(id) == exclude_id), slug: None })
    }

    pub async fn artworks(&self, artist_id: Uuid) -> Result<Vec<artwork::Model>, ServiceError> {
        self.get(artist_id).await?;
        self.artworks.list_by_artist(artist_id).await
    }

    /// Public gallery of an active artist, 12 pieces per page by default.
    pub async fn gallery(&self, slug: &str, page: Option<u32>, per_page: Option<u32>) -> Result<Page<artwork::Model>, ServiceError> {
        let a = self.get_public(slug).await?;
        let mut pieces = self.artworks.list_by_artist(a.id).await?;
        pieces.sort_by(artwork::gallery_order);
        Ok(Page::from_vec(pieces, Pagination::new(page, per_page, GALLERY_PER_PAGE)))
    }

    #[instrument(skip(self, input))]
    pub async fn add_artwork(&self, artist_id: Uuid, input: ArtworkInput) -> Result<artwork::Model, ServiceError> {
        let existing = self.artworks(artist_id).await?;
        let position = match input.position {
            Some(p) => artwork::validate_position(p)?,
            None => crate::next_position(existing.iter().map(|w| w.position))?,
        };
        let model = artwork::Model {
            id: Uuid::new_v4(),
            artist_id,
            title: artwork::validate_title(&input.title)?,
            description: validate::bounded("description", &input.description, 5000)?,
            image_url: validate::url("image_url", &input.image_url)?,
            position,
            created_at: crate::now(),
        };
        self.artworks.insert(model).await
    }

    pub async fn update_artwork(&self, id: Uuid, patch: ArtworkPatch) -> Result<artwork::Model, ServiceError> {
        let mut w = self.artworks.get(id).await?.ok_or_else(|| ServiceError::not_found("artwork"))?;
        if let Some(t) = patch.title.as_deref() {
            w.title = artwork::validate_title(t)?;
        }
        if let Some(d) = patch.description.as_deref() {
            w.description = validate::bounded("description", d, 5000)?;
        }
        if let Some(u) = patch.image_url.as_deref() {
            w.image_url = validate::url("image_url", u)?;
        }
        if let Some(p) = patch.position {
            w.position = artwork::validate_position(p)?;
        }
        self.artworks.update(w).await
    }

    pub async fn delete_artwork(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.artworks.delete(id).await? {
            return Err(ServiceError::not_found("artwork"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTable;
    use serde_json::json;

    fn service() -> ArtistService {
        ArtistService::new(Arc::new(MemoryTable::<artist::Model>::new()), Arc::new(MemoryTable::<artwork::Model>::new()))
    }

    fn input(name: &str, email: &str) -> ArtistInput {
        ArtistInput { name: name.into(), email: email.into(), active: true, ..Default::default() }
    }

    #[tokio::test]
    async fn create_derives_unique_slugs() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Ada Lovelace", "ada@example.com")).await?;
        let b = svc.create(input("Ada  Lovelace!", "ada2@example.com")).await?;
        assert_eq!(a.slug, "ada-lovelace");
        assert_eq!(b.slug, "ada-lovelace-2");
        assert_eq!(a.social_links, json!({}));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_and_explicit_slug_conflict() {
        let svc = service();
        svc.create(input("Ada", "ada@example.com")).await.unwrap();
        let dup = svc.create(input("Other", "ADA@example.com")).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let explicit = ArtistInput { slug: Some("ada".into()), ..input("Someone", "s@example.com") };
        assert!(matches!(svc.create(explicit).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn validation_errors_surface() {
        let svc = service();
        assert!(matches!(svc.create(input("", "a@example.com")).await, Err(ServiceError::Model(_))));
        assert!(matches!(svc.create(input("Ada", "not-an-email")).await, Err(ServiceError::Model(_))));
        let bad_url = ArtistInput { website: Some("www.ada.art".into()), ..input("Ada", "a@example.com") };
        assert!(svc.create(bad_url).await.is_err());
    }

    #[tokio::test]
    async fn check_slug_and_email_honor_exclude_id() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Mira", "mira@example.com")).await?;
        assert!(!svc.check_slug("Mira", None).await?.available);
        assert!(svc.check_slug("mira", Some(a.id)).await?.available);
        assert_eq!(svc.check_slug("New Name", None).await?.slug.as_deref(), Some("new-name"));
        assert!(!svc.check_email("MIRA@example.com", None).await?.available);
        assert!(svc.check_email("mira@example.com", Some(a.id)).await?.available);
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_own_slug_and_email() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Mira", "mira@example.com")).await?;
        let patch = ArtistPatch {
            slug: Some("mira".into()),
            email: Some("mira@example.com".into()),
            bio: Some("Painter".into()),
            ..Default::default()
        };
        let updated = svc.update(a.id, patch).await?;
        assert_eq!(updated.slug, "mira");
        assert_eq!(updated.bio, "Painter");
        assert!(updated.updated_at >= a.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn public_listing_hides_inactive_and_puts_featured_first() -> Result<(), anyhow::Error> {
        let svc = service();
        svc.create(input("Zed", "z@example.com")).await?;
        svc.create(ArtistInput { featured: true, ..input("Yara", "y@example.com") }).await?;
        svc.create(input("Abe", "a@example.com")).await?;
        svc.create(ArtistInput { active: false, ..input("Hidden", "h@example.com") }).await?;

        let page = svc.list_public(&PublicArtistQuery::default()).await?;
        let names: Vec<_> = page.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Yara", "Abe", "Zed"]);
        assert!(svc.get_public("hidden").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn gallery_pages_artworks_in_position_order() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Mira", "mira@example.com")).await?;
        for i in 0..14 {
            let w = ArtworkInput {
                title: format!("Piece {i}"),
                image_url: format!("https://cdn.example.com/{i}.jpg"),
                position: Some(13 - i),
                ..Default::default()
            };
            svc.add_artwork(a.id, w).await?;
        }
        let first = svc.gallery("mira", None, None).await?;
        assert_eq!(first.per_page, 12);
        assert_eq!(first.items.len(), 12);
        assert_eq!(first.items[0].title, "Piece 13");
        let second = svc.gallery("mira", Some(2), None).await?;
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.total_pages, 2);
        Ok(())
    }

    #[tokio::test]
    async fn artwork_position_defaults_to_end() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Mira", "mira@example.com")).await?;
        let w = |t: &str| ArtworkInput { title: t.into(), image_url: "https://cdn.example.com/x.jpg".into(), ..Default::default() };
        assert_eq!(svc.add_artwork(a.id, w("one")).await?.position, 0);
        assert_eq!(svc.add_artwork(a.id, w("two")).await?.position, 1);
        assert!(svc.add_artwork(Uuid::new_v4(), w("orphan")).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn artwork_after_max_position_is_rejected() -> Result<(), anyhow::Error> {
        let svc = service();
        let a = svc.create(input("Mira", "mira@example.com")).await?;
        let w = |t: &str, position| ArtworkInput {
            title: t.into(),
            image_url: "https://cdn.example.com/x.jpg".into(),
            position,
            ..Default::default()
        };
        assert_eq!(svc.add_artwork(a.id, w("last", Some(i32::MAX))).await?.position, i32::MAX);
        let next = svc.add_artwork(a.id, w("after", None)).await;
        assert!(matches!(next, Err(ServiceError::Validation(_))));
        assert_eq!(svc.artworks(a.id).await?.len(), 1);
        Ok(())
    }
}
