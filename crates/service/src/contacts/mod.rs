//! Contact form and the chat-style admin inbox.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ContactService;
