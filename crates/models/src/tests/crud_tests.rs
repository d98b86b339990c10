use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use super::test_db;
use crate::{artist, artwork, blog_post, comment, contact_message, contact_reply, meeting};
use crate::comment::CommentStatus;
use crate::contact_message::ContactStatus;
use crate::contact_reply::Author;
use crate::meeting::MeetingStatus;

fn new_artist(tag: &str) -> artist::Model {
    let now = Utc::now().into();
    artist::Model {
        id: Uuid::new_v4(),
        name: format!("Artist {tag}"),
        slug: format!("artist-{tag}"),
        email: format!("{tag}@example.com"),
        discipline: "illustration".into(),
        bio: String::new(),
        avatar_url: None,
        website: None,
        social_links: json!({}),
        featured: false,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Artist with artworks; deleting the artist cascades to the gallery
#[tokio::test]
async fn test_artist_artwork_cascade() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let tag = Uuid::new_v4().simple().to_string();

    let a = new_artist(&tag).into_active_model().reset_all().insert(&db).await?;
    let w = artwork::ActiveModel {
        id: Set(Uuid::new_v4()),
        artist_id: Set(a.id),
        title: Set("Study".into()),
        description: Set(String::new()),
        image_url: Set("https://cdn.example.com/study.jpg".into()),
        position: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;

    let works = a.find_related(artwork::Entity).all(&db).await?;
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id, w.id);

    artist::Entity::delete_by_id(a.id).exec(&db).await?;
    assert!(artwork::Entity::find_by_id(w.id).one(&db).await?.is_none());
    Ok(())
}

/// Status enums survive the round trip through string columns
#[tokio::test]
async fn test_contact_thread_and_status() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let now = Utc::now();

    let c = contact_message::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Visitor".into()),
        email: Set("visitor@example.com".into()),
        phone: Set(None),
        subject: Set(Some("Commission".into())),
        message: Set("Hello".into()),
        status: Set(ContactStatus::New),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    contact_reply::ActiveModel {
        id: Set(Uuid::new_v4()),
        contact_id: Set(c.id),
        author: Set(Author::Admin),
        body: Set("Thanks!".into()),
        created_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    let mut am: contact_message::ActiveModel = c.clone().into();
    am.status = Set(ContactStatus::Replied);
    let updated = am.update(&db).await?;
    assert_eq!(updated.status, ContactStatus::Replied);

    let replied = contact_message::Entity::find()
        .filter(contact_message::Column::Status.eq(ContactStatus::Replied))
        .filter(contact_message::Column::Id.eq(c.id))
        .one(&db)
        .await?;
    assert!(replied.is_some());

    contact_message::Entity::delete_by_id(c.id).exec(&db).await?;
    let orphans = contact_reply::Entity::find()
        .filter(contact_reply::Column::ContactId.eq(c.id))
        .all(&db)
        .await?;
    assert!(orphans.is_empty());
    Ok(())
}

/// Blog slug uniqueness is enforced by the table
#[tokio::test]
async fn test_blog_slug_unique_and_comments() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let now = Utc::now();
    let slug = format!("post-{}", Uuid::new_v4().simple());

    let make = |id: Uuid| blog_post::ActiveModel {
        id: Set(id),
        title: Set("Post".into()),
        slug: Set(slug.clone()),
        excerpt: Set(String::new()),
        content: Set("Body".into()),
        cover_image_url: Set(None),
        author: Set("Studio".into()),
        tags: Set(json!(["news"])),
        published: Set(true),
        published_at: Set(Some(now.into())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let p = make(Uuid::new_v4()).insert(&db).await?;
    assert!(make(Uuid::new_v4()).insert(&db).await.is_err());
    assert!(p.has_tag("NEWS"));

    comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        post_id: Set(p.id),
        author_name: Set("Reader".into()),
        author_email: Set("reader@example.com".into()),
        body: Set("Nice".into()),
        status: Set(CommentStatus::Pending),
        created_at: Set(now.into()),
    }
    .insert(&db)
    .await?;
    assert_eq!(p.find_related(comment::Entity).all(&db).await?.len(), 1);

    blog_post::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}

/// Removing an artist keeps their meetings, with the link cleared
#[tokio::test]
async fn test_meeting_survives_artist_delete() -> Result<()> {
    let Some(db) = test_db().await else { return Ok(()) };
    let tag = Uuid::new_v4().simple().to_string();
    let a = new_artist(&tag).into_active_model().reset_all().insert(&db).await?;
    let now = Utc::now();

    let m = meeting::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Kickoff".into()),
        description: Set(String::new()),
        attendee_name: Set("Client".into()),
        attendee_email: Set("client@example.com".into()),
        artist_id: Set(Some(a.id)),
        start_time: Set((now + chrono::Duration::days(1)).into()),
        duration_minutes: Set(30),
        timezone: Set("UTC".into()),
        meeting_link: Set(None),
        calendar_event_id: Set(None),
        status: Set(MeetingStatus::Scheduled),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    artist::Entity::delete_by_id(a.id).exec(&db).await?;
    let after = meeting::Entity::find_by_id(m.id).one(&db).await?.expect("meeting kept");
    assert_eq!(after.artist_id, None);
    meeting::Entity::delete_by_id(m.id).exec(&db).await?;
    Ok(())
}
