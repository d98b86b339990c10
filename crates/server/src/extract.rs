//! `Json`, `Query` and `Path` extractors whose rejections use the JSON error
//! body instead of axum's plain-text responses.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::{request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;

use crate::errors::JsonApiError;

pub struct ApiJson<T>(pub T);

pub struct ApiQuery<T>(pub T);

pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type", Some(message))
            }
            JsonRejection::BytesRejection(ref r) if r.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", Some(message))
            }
            _ => Self::bad_request(message),
        }
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Rating {
        rating: i32,
    }

    #[tokio::test]
    async fn json_rejections_become_json_errors() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();
        let err = ApiJson::<Rating>::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.unwrap_or_default().contains("rating"));

        let req = Request::builder().method("POST").body(Body::from(r#"{"rating":5}"#)).unwrap();
        let err = ApiJson::<Rating>::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"rating":5}"#))
            .unwrap();
        let ApiJson(ok) = ApiJson::<Rating>::from_request(req, &()).await.unwrap();
        assert_eq!(ok.rating, 5);
    }

    #[tokio::test]
    async fn query_rejection_is_bad_request() {
        let (mut parts, _) = Request::builder().uri("/x?rating=lots").body(()).unwrap().into_parts();
        let err = ApiQuery::<Rating>::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.title, "Validation Error");
    }
}
