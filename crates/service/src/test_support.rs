#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig { url, max_connections: 10, min_connections: 1, ..DatabaseConfig::default() })
}

/// Migrated Postgres connection, or `None` when no test database is
/// configured (the caller then skips).
pub async fn get_db() -> Option<DatabaseConnection> {
    let cfg = test_config()?;
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect_with_config(&cfg).await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        return None;
    }
    connect_with_config(&cfg).await.ok()
}

mod seaorm_repository_tests {
    use super::get_db;
    use crate::app::Repositories;
    use crate::artists::domain::{ArtistInput, ArtworkInput};
    use crate::artists::ArtistService;
    use crate::blog::domain::{CommentInput, PostInput};
    use crate::blog::{BlogService, CommentService};
    use crate::cache::ListingCache;
    use crate::errors::ServiceError;
    use uuid::Uuid;

    #[tokio::test]
    async fn artist_slug_and_email_uniqueness_against_postgres() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repos = Repositories::seaorm(&db);
        let svc = ArtistService::new(repos.artists, repos.artworks);

        let tag = Uuid::new_v4().simple().to_string();
        let name = format!("Ada {tag}");
        let email = format!("ada-{tag}@example.com");
        let a = svc.create(ArtistInput { name: name.clone(), email: email.clone(), active: true, ..Default::default() }).await?;
        let b = svc
            .create(ArtistInput { name, email: format!("b-{tag}@example.com"), active: true, ..Default::default() })
            .await?;
        assert_eq!(b.slug, format!("{}-2", a.slug));

        let dup = svc.create(ArtistInput { name: "Other".into(), email, ..Default::default() }).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let piece = ArtworkInput { title: "Study".into(), image_url: "https://cdn.example.com/s.jpg".into(), ..Default::default() };
        svc.add_artwork(a.id, piece).await?;
        assert_eq!(svc.artworks(a.id).await?.len(), 1);

        svc.delete(a.id).await?;
        svc.delete(b.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn published_posts_and_comments_against_postgres() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repos = Repositories::seaorm(&db);
        let blog = BlogService::new(repos.posts.clone(), ListingCache::default());
        let comments = CommentService::new(repos.posts, repos.comments);

        let title = format!("Post {}", Uuid::new_v4().simple());
        let post = blog
            .create(PostInput { title, content: "Body".into(), tags: vec!["news".into()], published: true, ..Default::default() })
            .await?;
        assert!(post.published_at.is_some());
        assert!(post.has_tag("NEWS"));

        let c = comments
            .submit(&post.slug, CommentInput { author_name: "Bo".into(), author_email: "bo@example.com".into(), body: "Nice".into() })
            .await?;
        assert!(comments.list_public(&post.slug).await?.is_empty());
        comments.moderate(c.id, models::comment::CommentStatus::Approved).await?;
        assert_eq!(comments.list_public(&post.slug).await?.len(), 1);

        blog.delete(post.id).await?;
        Ok(())
    }
}
