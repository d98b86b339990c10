#![allow(dead_code)]
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use configs::AppConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use service::integrations::calendar::mock::MockCalendar;
use service::integrations::mail::mock::RecordingMailer;
use service::integrations::media::mock::MockMediaStore;
use service::{Integrations, Repositories};

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub calendar: Arc<MockCalendar>,
    pub media: Arc<MockMediaStore>,
}

pub fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    cfg.site.name = "Studio".into();
    cfg.site.inbox_email = "inbox@studio.test".into();
    cfg.site.frontend_dir = "target/test-frontend".into();
    cfg.media.max_upload_bytes = 1024;
    cfg
}

/// Router over in-memory repositories with recording integrations.
pub fn app() -> TestApp {
    app_with(config())
}

pub fn app_with(cfg: AppConfig) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    let calendar = Arc::new(MockCalendar::default());
    let media = Arc::new(MockMediaStore::default());
    let integrations = Integrations { mailer: mailer.clone(), calendar: calendar.clone(), media: media.clone() };
    let router = server::build_app(&cfg, Repositories::in_memory(), integrations);
    TestApp { router, mailer, calendar, media }
}

fn unix_now() -> usize {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_secs() as usize
}

pub fn token_expiring_in(secs: i64) -> String {
    let exp = (unix_now() as i64 + secs).max(0) as usize;
    let claims = serde_json::json!({ "sub": "admin@studio.test", "exp": exp, "iat": unix_now() });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

pub fn admin_token() -> String {
    token_expiring_in(3600)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        b = b.header("authorization", format!("Bearer {t}"));
    }
    match body {
        Some(v) => b
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => b.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
