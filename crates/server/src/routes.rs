use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, DefaultBodyLimit, Request},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::metrics;
use crate::openapi::ApiDoc;

pub mod artists;
pub mod auth;
pub mod blog;
pub mod contacts;
pub mod feedback;
pub mod meetings;
pub mod offerings;
pub mod uploads;

use auth::ServerState;

pub type ApiResult<T> = Result<Json<T>, JsonApiError>;

/// Multipart framing on top of the configured file size.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Unknown `/api/*` paths get a JSON 404; everything else is the static
/// site with `index.html` as the SPA fallback.
async fn site_fallback(static_dir: ServeDir<ServeFile>, req: Request) -> Response {
    if req.uri().path().starts_with("/api/") {
        return JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("no such endpoint".into())).into_response();
    }
    match static_dir.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

/// Throttle key: first `X-Forwarded-For` hop, else the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<ConnectInfo<SocketAddr>>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn throttle_submission(
    state: &ServerState,
    headers: &HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Result<(), JsonApiError> {
    state.services.throttle.check(&client_key(headers, peer)).map_err(JsonApiError::from)
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/services", get(offerings::list_public))
        .route("/api/services/:slug", get(offerings::get_public))
        .route("/api/artists", get(artists::list_public))
        .route("/api/artists/:slug", get(artists::get_public))
        .route("/api/artists/:slug/artworks", get(artists::gallery))
        .route("/api/blog/posts", get(blog::list_public))
        .route("/api/blog/posts/:slug", get(blog::get_public))
        .route("/api/blog/posts/:slug/comments", get(blog::list_comments).post(blog::submit_comment))
        .route("/api/contact", post(contacts::submit))
        .route("/api/feedback", get(feedback::testimonials).post(feedback::submit))
}

fn admin_routes(state: &ServerState, upload_limit: usize) -> Router<ServerState> {
    Router::new()
        .route("/api/admin/me", get(auth::me))
        // artists and artworks
        .route("/api/admin/artists", get(artists::list).post(artists::create))
        .route("/api/admin/artists/check-slug", get(artists::check_slug))
        .route("/api/admin/artists/check-email", get(artists::check_email))
        .route("/api/admin/artists/:id", get(artists::get).put(artists::update).delete(artists::delete))
        .route("/api/admin/artists/:id/artworks", get(artists::list_artworks).post(artists::add_artwork))
        .route("/api/admin/artworks/:id", put(artists::update_artwork).delete(artists::delete_artwork))
        // inbox
        .route("/api/admin/contacts", get(contacts::list))
        .route(
            "/api/admin/contacts/:id",
            get(contacts::get).patch(contacts::set_status).delete(contacts::delete),
        )
        .route("/api/admin/contacts/:id/messages", get(contacts::thread).post(contacts::reply))
        // feedback
        .route("/api/admin/feedback", get(feedback::list))
        .route("/api/admin/feedback/:id", axum::routing::patch(feedback::set_approved).delete(feedback::delete))
        // blog
        .route("/api/admin/blog/posts", get(blog::list).post(blog::create))
        .route("/api/admin/blog/posts/check-slug", get(blog::check_slug))
        .route("/api/admin/blog/posts/:id", get(blog::get).put(blog::update).delete(blog::delete))
        .route("/api/admin/comments", get(blog::list_all_comments))
        .route(
            "/api/admin/comments/:id",
            axum::routing::patch(blog::moderate_comment).delete(blog::delete_comment),
        )
        // services
        .route("/api/admin/services", get(offerings::list).post(offerings::create))
        .route(
            "/api/admin/services/:id",
            get(offerings::get).put(offerings::update).delete(offerings::delete),
        )
        // meetings
        .route("/api/admin/schedule-meeting", post(meetings::schedule))
        .route("/api/admin/meetings", get(meetings::list))
        .route("/api/admin/meetings/:id", get(meetings::get))
        .route("/api/admin/meetings/:id/cancel", post(meetings::cancel))
        // media
        .route(
            "/api/upload",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit + MULTIPART_OVERHEAD)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
}

/// Build the full application router: public API, admin API behind the
/// bearer guard, docs, metrics and the static site as fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let index = format!("{}/index.html", frontend_dir.trim_end_matches('/'));
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));
    let upload_limit = state.services.uploads.max_bytes();

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .merge(public_routes())
        .merge(admin_routes(&state, upload_limit))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(move |req: Request| site_fallback(static_dir.clone(), req))
        .layer(middleware::from_fn(metrics::track))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
