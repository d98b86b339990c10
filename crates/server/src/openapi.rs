use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct AvailabilityDoc {
    pub available: bool,
    pub slug: Option<String>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::offerings::list_public,
        crate::routes::offerings::get_public,
        crate::routes::artists::list_public,
        crate::routes::artists::get_public,
        crate::routes::artists::gallery,
        crate::routes::blog::list_public,
        crate::routes::blog::get_public,
        crate::routes::blog::list_comments,
        crate::routes::blog::submit_comment,
        crate::routes::contacts::submit,
        crate::routes::feedback::submit,
        crate::routes::feedback::testimonials,
        crate::routes::auth::me,
        crate::routes::artists::list,
        crate::routes::artists::create,
        crate::routes::artists::check_slug,
        crate::routes::artists::check_email,
        crate::routes::artists::get,
        crate::routes::artists::update,
        crate::routes::artists::delete,
        crate::routes::artists::list_artworks,
        crate::routes::artists::add_artwork,
        crate::routes::artists::update_artwork,
        crate::routes::artists::delete_artwork,
        crate::routes::contacts::list,
        crate::routes::contacts::get,
        crate::routes::contacts::set_status,
        crate::routes::contacts::delete,
        crate::routes::contacts::thread,
        crate::routes::contacts::reply,
        crate::routes::feedback::list,
        crate::routes::feedback::set_approved,
        crate::routes::feedback::delete,
        crate::routes::blog::list,
        crate::routes::blog::create,
        crate::routes::blog::check_slug,
        crate::routes::blog::get,
        crate::routes::blog::update,
        crate::routes::blog::delete,
        crate::routes::blog::list_all_comments,
        crate::routes::blog::moderate_comment,
        crate::routes::blog::delete_comment,
        crate::routes::offerings::list,
        crate::routes::offerings::create,
        crate::routes::offerings::get,
        crate::routes::offerings::update,
        crate::routes::offerings::delete,
        crate::routes::meetings::schedule,
        crate::routes::meetings::list,
        crate::routes::meetings::get,
        crate::routes::meetings::cancel,
        crate::routes::uploads::upload,
    ),
    components(schemas(HealthResponse, ErrorResponse, AvailabilityDoc)),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "public", description = "Marketing site API"),
        (name = "admin", description = "Back office API, bearer token required")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_public_and_admin_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/admin/schedule-meeting"));
        assert!(doc.paths.paths.contains_key("/api/blog/posts/{slug}/comments"));
    }
}
