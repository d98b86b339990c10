//! Blog posts and visitor comments.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::{BlogService, CommentService};
