//! Artists and their artworks.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ArtistService;
