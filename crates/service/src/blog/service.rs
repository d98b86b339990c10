use std::sync::Arc;

use common::types::Availability;
use common::utils::filter::matches_query;
use common::utils::slug::slugify;
use common::utils::sorting::{stable_sort, SortOrder};
use models::comment::CommentStatus;
use models::{blog_post, comment, validate};
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{CommentFilter, CommentInput, PostFilter, PostInput, PostPatch, PublicPostQuery};
use super::repository::{CommentRepository, PostRepository};
use crate::cache::ListingCache;
use crate::errors::ServiceError;
use crate::listing::ListQuery;
use crate::pagination::{Page, Pagination, DEFAULT_PER_PAGE};
use crate::slugs::{availability, pick_slug};

const EXCERPT_LEN: usize = 200;
const MAX_CONTENT_LEN: usize = 100_000;

/// Whitespace-collapsed start of `content`, cut on a word boundary.
pub fn excerpt_from(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_LEN {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_LEN).collect();
    let cut = match cut.rfind(' ') {
        Some(i) => &cut[..i],
        None => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    published: ListingCache<Vec<blog_post::Model>>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, published: ListingCache<Vec<blog_post::Model>>) -> Self {
        Self { posts, published }
    }

    pub async fn list(&self, query: &ListQuery, filter: &PostFilter) -> Result<Page<blog_post::Model>, ServiceError> {
        let rows = self.posts.list().await?;
        query.apply(rows, ("created_at", SortOrder::Desc), |p| {
            filter.published.map_or(true, |v| p.published == v)
                && matches_query([p.title.as_str(), p.author.as_str(), p.excerpt.as_str()], query.search())
        })
    }

    /// Published posts, newest first, optionally narrowed by tag and search.
    pub async fn list_public(&self, query: &PublicPostQuery) -> Result<Page<blog_post::Model>, ServiceError> {
        let all = self
            .published
            .get_or_try_load("published", || async {
                let rows: Vec<_> = self.posts.list().await?.into_iter().filter(|p| p.published).collect();
                stable_sort(rows, "published_at", SortOrder::Desc).map_err(ServiceError::from)
            })
            .await?;
        let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let search = query.q.as_deref().unwrap_or("");
        let rows: Vec<_> = all
            .iter()
            .filter(|p| tag.map_or(true, |t| p.has_tag(t)))
            .filter(|p| matches_query([p.title.as_str(), p.excerpt.as_str(), p.content.as_str()], search))
            .cloned()
            .collect();
        Ok(Page::from_vec(rows, Pagination::new(query.page, query.per_page, DEFAULT_PER_PAGE)))
    }

    pub async fn get(&self, id: Uuid) -> Result<blog_post::Model, ServiceError> {
        self.posts.get(id).await?.ok_or_else(|| ServiceError::not_found("post"))
    }

    pub async fn get_public(&self, slug: &str) -> Result<blog_post::Model, ServiceError> {
        match self.posts.find_by_slug(slug).await? {
            Some(p) if p.published => Ok(p),
            _ => Err(ServiceError::not_found("post")),
        }
    }

    async fn taken_slugs(&self, base: &str, except: Option<&str>) -> Result<Vec<String>, ServiceError> {
        let mut taken = self.posts.slugs_with_prefix(base).await?;
        if let Some(own) = except {
            taken.retain(|s| s != own);
        }
        Ok(taken)
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: PostInput) -> Result<blog_post::Model, ServiceError> {
        let title = blog_post::validate_title(&input.title)?;
        let content = validate::required("content", &input.content, MAX_CONTENT_LEN)?;
        let base = slugify(input.slug.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(&title))?;
        let slug = pick_slug(input.slug.as_deref(), &title, &self.taken_slugs(&base, None).await?)?;
        let excerpt = match input.excerpt.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(e) => validate::bounded("excerpt", e, 500)?,
            None => excerpt_from(&content),
        };
        let now = crate::now();
        let model = blog_post::Model {
            id: Uuid::new_v4(),
            title,
            slug,
            excerpt,
            content,
            cover_image_url: validate::optional_url("cover_image_url", input.cover_image_url.as_deref())?,
            author: validate::bounded("author", &input.author, 128)?,
            tags: blog_post::normalize_tags(&input.tags)?,
            published: input.published,
            published_at: input.published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        let saved = self.posts.insert(model).await?;
        if saved.published {
            self.published.invalidate_all();
        }
        info!(post_id = %saved.id, slug = %saved.slug, "post created");
        Ok(saved)
    }

    /// `published_at` is set the first time a post is published and kept
    /// through later unpublish/publish cycles.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<blog_post::Model, ServiceError> {
        let mut p = self.get(id).await?;
        if let Some(t) = patch.title.as_deref() {
            p.title = blog_post::validate_title(t)?;
        }
        if let Some(raw) = patch.slug.as_deref().filter(|s| !s.trim().is_empty()) {
            let wanted = slugify(raw)?;
            if wanted != p.slug {
                p.slug = pick_slug(Some(&wanted), &p.title, &self.taken_slugs(&wanted, Some(&p.slug)).await?)?;
            }
        }
        if let Some(c) = patch.content.as_deref() {
            p.content = validate::required("content", c, MAX_CONTENT_LEN)?;
        }
        match patch.excerpt.as_deref().map(str::trim) {
            Some("") => p.excerpt = excerpt_from(&p.content),
            Some(e) => p.excerpt = validate::bounded("excerpt", e, 500)?,
            None => {}
        }
        if let Some(url) = patch.cover_image_url.as_deref() {
            p.cover_image_url = validate::optional_url("cover_image_url", Some(url))?;
        }
        if let Some(a) = patch.author.as_deref() {
            p.author = validate::bounded("author", a, 128)?;
        }
        if let Some(tags) = patch.tags.as_deref() {
            p.tags = blog_post::normalize_tags(tags)?;
        }
        let now = crate::now();
        if let Some(published) = patch.published {
            p.published = published;
            if published && p.published_at.is_none() {
                p.published_at = Some(now);
            }
        }
        p.updated_at = now;
        let saved = self.posts.update(p).await?;
        self.published.invalidate_all();
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.posts.delete(id).await? {
            return Err(ServiceError::not_found("post"));
        }
        self.published.invalidate_all();
        Ok(())
    }

    pub async fn check_slug(&self, raw: &str, exclude_id: Option<Uuid>) -> Result<Availability, ServiceError> {
        let slug = slugify(raw)?;
        let owner = self.posts.find_by_slug(&slug).await?.map(|p| p.id);
        Ok(availability(slug, owner, exclude_id))
    }
}

/// Visitor comments and their moderation.
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    async fn published_post(&self, slug: &str) -> Result<blog_post::Model, ServiceError> {
        match self.posts.find_by_slug(slug).await? {
            Some(p) if p.published => Ok(p),
            _ => Err(ServiceError::not_found("post")),
        }
    }

    /// Approved comments of a published post, oldest first.
    pub async fn list_public(&self, slug: &str) -> Result<Vec<comment::Model>, ServiceError> {
        let post = self.published_post(slug).await?;
        let rows = self.comments.list_by_post(post.id).await?;
        Ok(rows.into_iter().filter(|c| c.status == CommentStatus::Approved).collect())
    }

    /// New comments wait for moderation.
    #[instrument(skip(self, input))]
    pub async fn submit(&self, slug: &str, input: CommentInput) -> Result<comment::Model, ServiceError> {
        let post = self.published_post(slug).await?;
        let model = comment::Model {
            id: Uuid::new_v4(),
            post_id: post.id,
            author_name: validate::required("author_name", &input.author_name, 128)?,
            author_email: validate::email("author_email", &input.author_email)?,
            body: comment::validate_body(&input.body)?,
            status: CommentStatus::Pending,
            created_at: crate::now(),
        };
        let saved = self.comments.insert(model).await?;
        info!(comment_id = %saved.id, post_id = %post.id, "comment submitted");
        Ok(saved)
    }

    pub async fn list(&self, query: &ListQuery, filter: &CommentFilter) -> Result<Page<comment::Model>, ServiceError> {
        let rows = self.comments.list().await?;
        query.apply(rows, ("created_at", SortOrder::Desc), |c| {
            filter.status.map_or(true, |s| c.status == s)
                && filter.post_id.map_or(true, |id| c.post_id == id)
                && matches_query([c.author_name.as_str(), c.author_email.as_str(), c.body.as_str()], query.search())
        })
    }

    #[instrument(skip(self))]
    pub async fn moderate(&self, id: Uuid, status: CommentStatus) -> Result<comment::Model, ServiceError> {
        let mut c = self.comments.get(id).await?.ok_or_else(|| ServiceError::not_found("comment"))?;
        c.status = status;
        self.comments.update(c).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.comments.delete(id).await? {
            return Err(ServiceError::not_found("comment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTable;

    fn services() -> (BlogService, CommentService) {
        let posts = Arc::new(MemoryTable::<blog_post::Model>::new());
        let comments = Arc::new(MemoryTable::<comment::Model>::new());
        (BlogService::new(posts.clone(), ListingCache::default()), CommentService::new(posts, comments))
    }

    fn post(title: &str, published: bool) -> PostInput {
        PostInput { title: title.into(), content: format!("All about {title}."), published, ..Default::default() }
    }

    #[test]
    fn excerpt_cuts_on_word_boundary() {
        assert_eq!(excerpt_from("  short\n\ntext "), "short text");
        let long = "word ".repeat(100);
        let e = excerpt_from(&long);
        assert!(e.ends_with('…'));
        assert!(e.chars().count() <= EXCERPT_LEN + 1);
        assert!(!e.contains("  "));
    }

    #[tokio::test]
    async fn publishing_sets_published_at_once() -> Result<(), anyhow::Error> {
        let (blog, _) = services();
        let draft = blog.create(post("Draft", false)).await?;
        assert!(draft.published_at.is_none());

        let live = blog.update(draft.id, PostPatch { published: Some(true), ..Default::default() }).await?;
        let first = live.published_at.expect("set on publish");
        blog.update(draft.id, PostPatch { published: Some(false), ..Default::default() }).await?;
        let again = blog.update(draft.id, PostPatch { published: Some(true), ..Default::default() }).await?;
        assert_eq!(again.published_at, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn public_listing_filters_by_tag_and_hides_drafts() -> Result<(), anyhow::Error> {
        let (blog, _) = services();
        blog.create(PostInput { tags: vec!["Murals".into(), "murals".into()], ..post("Wall art", true) }).await?;
        blog.create(PostInput { tags: vec!["print".into()], ..post("Risograph", true) }).await?;
        blog.create(PostInput { tags: vec!["murals".into()], ..post("Secret", false) }).await?;

        let all = blog.list_public(&PublicPostQuery::default()).await?;
        assert_eq!(all.total, 2);
        let murals = blog.list_public(&PublicPostQuery { tag: Some("MURALS".into()), ..Default::default() }).await?;
        assert_eq!(murals.total, 1);
        assert_eq!(murals.items[0].tag_list(), vec!["Murals".to_string()]);
        assert!(blog.get_public("secret").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn cached_listing_sees_new_posts() -> Result<(), anyhow::Error> {
        let (blog, _) = services();
        blog.create(post("One", true)).await?;
        assert_eq!(blog.list_public(&PublicPostQuery::default()).await?.total, 1);
        blog.create(post("Two", true)).await?;
        assert_eq!(blog.list_public(&PublicPostQuery::default()).await?.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn slugs_are_unique() -> Result<(), anyhow::Error> {
        let (blog, _) = services();
        let a = blog.create(post("Hello World", true)).await?;
        let b = blog.create(post("Hello, World", true)).await?;
        assert_eq!((a.slug.as_str(), b.slug.as_str()), ("hello-world", "hello-world-2"));
        assert!(!blog.check_slug("hello world", None).await?.available);
        assert!(blog.check_slug("hello world", Some(a.id)).await?.available);
        let clash = blog.update(b.id, PostPatch { slug: Some("hello-world".into()), ..Default::default() }).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn comments_are_moderated_before_showing() -> Result<(), anyhow::Error> {
        let (blog, comments) = services();
        let p = blog.create(post("Open studio", true)).await?;
        let input = CommentInput { author_name: "Bo".into(), author_email: "bo@example.com".into(), body: "See you there".into() };
        let c = comments.submit(&p.slug, input.clone()).await?;
        assert_eq!(c.status, CommentStatus::Pending);
        assert!(comments.list_public(&p.slug).await?.is_empty());

        comments.moderate(c.id, CommentStatus::Approved).await?;
        assert_eq!(comments.list_public(&p.slug).await?.len(), 1);

        let pending = comments
            .list(&ListQuery::default(), &CommentFilter { status: Some(CommentStatus::Pending), post_id: None })
            .await?;
        assert_eq!(pending.total, 0);
        Ok(())
    }

    #[tokio::test]
    async fn comments_need_a_published_post_and_valid_fields() -> Result<(), anyhow::Error> {
        let (blog, comments) = services();
        let draft = blog.create(post("Draft", false)).await?;
        let input = CommentInput { author_name: "Bo".into(), author_email: "bo@example.com".into(), body: "hi".into() };
        assert!(matches!(comments.submit(&draft.slug, input.clone()).await, Err(ServiceError::NotFound(_))));

        let live = blog.create(post("Live", true)).await?;
        let long = CommentInput { body: "x".repeat(2001), ..input.clone() };
        assert!(comments.submit(&live.slug, long).await.is_err());
        let no_email = CommentInput { author_email: "".into(), ..input };
        assert!(comments.submit(&live.slug, no_email).await.is_err());
        Ok(())
    }
}
