//! SeaORM entities for the studio back office, with the field validation
//! shared by every layer above.

pub mod errors;
pub mod db;
pub mod validate;
pub mod artist;
pub mod artwork;
pub mod contact_message;
pub mod contact_reply;
pub mod feedback;
pub mod blog_post;
pub mod comment;
pub mod service_offering;
pub mod meeting;

#[cfg(test)]
mod tests;
