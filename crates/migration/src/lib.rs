//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_artist;
mod m20240301_000002_create_artwork;
mod m20240301_000003_create_contact_message;
mod m20240301_000004_create_contact_reply;
mod m20240301_000005_create_feedback;
mod m20240301_000006_create_blog_post;
mod m20240301_000007_create_comment;
mod m20240301_000008_create_service;
mod m20240301_000009_create_meeting;
mod m20240301_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_artist::Migration),
            Box::new(m20240301_000002_create_artwork::Migration),
            Box::new(m20240301_000003_create_contact_message::Migration),
            Box::new(m20240301_000004_create_contact_reply::Migration),
            Box::new(m20240301_000005_create_feedback::Migration),
            Box::new(m20240301_000006_create_blog_post::Migration),
            Box::new(m20240301_000007_create_comment::Migration),
            Box::new(m20240301_000008_create_service::Migration),
            Box::new(m20240301_000009_create_meeting::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000010_add_indexes::Migration),
        ]
    }
}
