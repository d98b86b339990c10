use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use service::AppServices;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub services: AppServices,
    pub auth: ServerAuthConfig,
}

/// Claims of the admin token issued by the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub subject: String,
    pub expires_at: usize,
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
/// Unauthorized for a malformed header, `Ok(None)` when absent.
fn extract_token(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => {
                tracing::warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthorized("Authorization header must use the Bearer scheme"))
            }
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Admin guard: missing token is 400, invalid or expired is 401.
/// Verified claims are attached to the request for downstream handlers.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = extract_token(&req)? else {
        tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
        return Err(JsonApiError::bad_request("missing bearer token"));
    };

    match verify_token(&token, &state.auth.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}

/// Who the current admin token belongs to.
#[utoipa::path(get, path = "/api/admin/me", tag = "admin", responses((status = 200, description = "Token subject"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(claims): Extension<Claims>) -> Json<MeOutput> {
    Json(MeOutput { subject: claims.sub, expires_at: claims.exp })
}
