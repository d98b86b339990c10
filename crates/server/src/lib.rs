//! HTTP layer of the studio back office: axum routes over `service`.

pub mod errors;
pub mod extract;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::{build_app, run};
