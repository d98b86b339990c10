//! Wiring of repositories, integrations and services.

use std::sync::Arc;

use configs::AppConfig;
use models::{artist, artwork, blog_post, comment, contact_message, contact_reply, feedback, meeting, service_offering};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::artists::repository::{ArtistRepository, ArtworkRepository, SeaOrmArtistRepository, SeaOrmArtworkRepository};
use crate::artists::ArtistService;
use crate::blog::repository::{CommentRepository, PostRepository, SeaOrmCommentRepository, SeaOrmPostRepository};
use crate::blog::{BlogService, CommentService};
use crate::cache::ListingCache;
use crate::contacts::repository::{ContactRepository, ReplyRepository, SeaOrmContactRepository, SeaOrmReplyRepository};
use crate::contacts::ContactService;
use crate::errors::ServiceError;
use crate::feedback::{FeedbackRepository, FeedbackService, SeaOrmFeedbackRepository};
use crate::integrations::{
    CalendarProvider, DisabledCalendar, DisabledMailer, DisabledMediaStore, HttpCalendar, HttpMailer, HttpMediaStore,
    Mailer, MediaStore,
};
use crate::meetings::{MeetingRepository, MeetingService, SeaOrmMeetingRepository};
use crate::offerings::{OfferingRepository, OfferingService, SeaOrmOfferingRepository};
use crate::storage::MemoryTable;
use crate::throttle::SubmissionThrottle;
use crate::uploads::UploadService;
use crate::SiteInfo;

/// One handle per entity table.
#[derive(Clone)]
pub struct Repositories {
    pub artists: Arc<dyn ArtistRepository>,
    pub artworks: Arc<dyn ArtworkRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub replies: Arc<dyn ReplyRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub offerings: Arc<dyn OfferingRepository>,
    pub meetings: Arc<dyn MeetingRepository>,
}

impl Repositories {
    pub fn seaorm(db: &DatabaseConnection) -> Self {
        Self {
            artists: Arc::new(SeaOrmArtistRepository { db: db.clone() }),
            artworks: Arc::new(SeaOrmArtworkRepository { db: db.clone() }),
            contacts: Arc::new(SeaOrmContactRepository { db: db.clone() }),
            replies: Arc::new(SeaOrmReplyRepository { db: db.clone() }),
            feedback: Arc::new(SeaOrmFeedbackRepository { db: db.clone() }),
            posts: Arc::new(SeaOrmPostRepository { db: db.clone() }),
            comments: Arc::new(SeaOrmCommentRepository { db: db.clone() }),
            offerings: Arc::new(SeaOrmOfferingRepository { db: db.clone() }),
            meetings: Arc::new(SeaOrmMeetingRepository { db: db.clone() }),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            artists: Arc::new(MemoryTable::<artist::Model>::new()),
            artworks: Arc::new(MemoryTable::<artwork::Model>::new()),
            contacts: Arc::new(MemoryTable::<contact_message::Model>::new()),
            replies: Arc::new(MemoryTable::<contact_reply::Model>::new()),
            feedback: Arc::new(MemoryTable::<feedback::Model>::new()),
            posts: Arc::new(MemoryTable::<blog_post::Model>::new()),
            comments: Arc::new(MemoryTable::<comment::Model>::new()),
            offerings: Arc::new(MemoryTable::<service_offering::Model>::new()),
            meetings: Arc::new(MemoryTable::<meeting::Model>::new()),
        }
    }
}

#[derive(Clone)]
pub struct Integrations {
    pub mailer: Arc<dyn Mailer>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub media: Arc<dyn MediaStore>,
}

impl Integrations {
    /// HTTP providers for every configured section, disabled ones otherwise.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let mailer: Arc<dyn Mailer> = if cfg.mail.is_enabled() {
            Arc::new(HttpMailer::new(&cfg.mail)?)
        } else {
            Arc::new(DisabledMailer)
        };
        let calendar: Arc<dyn CalendarProvider> = if cfg.calendar.is_enabled() {
            Arc::new(HttpCalendar::new(&cfg.calendar)?)
        } else {
            Arc::new(DisabledCalendar)
        };
        let media: Arc<dyn MediaStore> = if cfg.media.is_enabled() {
            Arc::new(HttpMediaStore::new(&cfg.media)?)
        } else {
            Arc::new(DisabledMediaStore)
        };
        info!(
            mail = cfg.mail.is_enabled(),
            calendar = cfg.calendar.is_enabled(),
            media = cfg.media.is_enabled(),
            "integrations configured"
        );
        Ok(Self { mailer, calendar, media })
    }

    pub fn disabled() -> Self {
        Self { mailer: Arc::new(DisabledMailer), calendar: Arc::new(DisabledCalendar), media: Arc::new(DisabledMediaStore) }
    }
}

/// Every service the HTTP layer calls.
#[derive(Clone)]
pub struct AppServices {
    pub artists: Arc<ArtistService>,
    pub contacts: Arc<ContactService>,
    pub feedback: Arc<FeedbackService>,
    pub blog: Arc<BlogService>,
    pub comments: Arc<CommentService>,
    pub offerings: Arc<OfferingService>,
    pub meetings: Arc<MeetingService>,
    pub uploads: Arc<UploadService>,
    pub throttle: Arc<SubmissionThrottle>,
}

impl AppServices {
    pub fn build(repos: Repositories, integrations: Integrations, cfg: &AppConfig) -> Self {
        let site = SiteInfo::from(&cfg.site);
        Self {
            artists: Arc::new(ArtistService::new(repos.artists.clone(), repos.artworks)),
            contacts: Arc::new(ContactService::new(
                repos.contacts,
                repos.replies,
                integrations.mailer.clone(),
                site.clone(),
            )),
            feedback: Arc::new(FeedbackService::new(repos.feedback, ListingCache::from_config(&cfg.cache))),
            blog: Arc::new(BlogService::new(repos.posts.clone(), ListingCache::from_config(&cfg.cache))),
            comments: Arc::new(CommentService::new(repos.posts, repos.comments)),
            offerings: Arc::new(OfferingService::new(repos.offerings, ListingCache::from_config(&cfg.cache))),
            meetings: Arc::new(MeetingService::new(
                repos.meetings,
                repos.artists,
                integrations.calendar,
                integrations.mailer,
                site,
            )),
            uploads: Arc::new(UploadService::new(integrations.media, cfg.media.max_upload_bytes, cfg.media.folder.clone())),
            throttle: Arc::new(SubmissionThrottle::from_config(&cfg.throttle)),
        }
    }
}
