use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

/// Admin routes accept HS256 bearer tokens signed with this secret.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Prebuilt marketing site served at `/`.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Address that receives contact form notifications.
    #[serde(default)]
    pub inbox_email: String,
    #[serde(default = "default_site_name")]
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            frontend_dir: default_frontend_dir(),
            data_dir: default_data_dir(),
            inbox_email: String::new(),
            name: default_site_name(),
        }
    }
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_data_dir() -> String { "data".into() }
fn default_site_name() -> String { "Studio".into() }

/// Transactional email provider (JSON HTTP API).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub from_name: String,
}

impl MailConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Calendar provider with video conferencing (Google Calendar v3 compatible).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_url")]
    pub api_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { api_url: default_calendar_url(), access_token: String::new(), calendar_id: default_calendar_id() }
    }
}

fn default_calendar_url() -> String { "https://www.googleapis.com/calendar/v3".into() }
fn default_calendar_id() -> String { "primary".into() }

impl CalendarConfig {
    pub fn is_enabled(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Media hosting used by `/api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub upload_url: String,
    #[serde(default)]
    pub upload_preset: String,
    #[serde(default = "default_media_folder")]
    pub folder: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: String::new(),
            upload_preset: String::new(),
            folder: default_media_folder(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_media_folder() -> String { "studio".into() }
fn default_max_upload() -> usize { 10 * 1024 * 1024 }

impl MediaConfig {
    pub fn is_enabled(&self) -> bool {
        !self.upload_url.trim().is_empty() && !self.upload_preset.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl(), max_entries: default_cache_capacity() }
    }
}

fn default_cache_ttl() -> u64 { 60 }
fn default_cache_capacity() -> u64 { 256 }

/// Token bucket applied per client to public form submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_burst")]
    pub burst: u32,
    #[serde(default = "default_refill")]
    pub refill_every_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { burst: default_burst(), refill_every_secs: default_refill(), enabled: true }
    }
}

fn default_burst() -> u32 { 5 }
fn default_refill() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn fill_from_env(slot: &mut String, var: &str) {
    if slot.trim().is_empty() {
        if let Ok(v) = std::env::var(var) {
            *slot = v;
        }
    }
}

impl AppConfig {
    /// Config file if present, otherwise defaults; env vars fill the gaps either way.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(_) => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults plus environment overrides, for deployments without a config file.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        fill_from_env(&mut self.auth.jwt_secret, "JWT_SECRET");
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        fill_from_env(&mut self.mail.api_key, "MAIL_API_KEY");
        fill_from_env(&mut self.calendar.access_token, "CALENDAR_ACCESS_TOKEN");
        fill_from_env(&mut self.media.upload_preset, "MEDIA_UPLOAD_PRESET");
        fill_from_env(&mut self.site.inbox_email, "SITE_INBOX_EMAIL");
        if self.mail.is_enabled() && !self.mail.from_address.contains('@') {
            return Err(anyhow!("mail.from_address must be an email address when mail is enabled"));
        }
        if self.throttle.burst == 0 || self.throttle.refill_every_secs == 0 {
            return Err(anyhow!("throttle.burst and throttle.refill_every_secs must be positive"));
        }
        if self.media.max_upload_bytes == 0 {
            return Err(anyhow!("media.max_upload_bytes must be positive"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        fill_from_env(&mut self.url, "DATABASE_URL");
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
host = "0.0.0.0"
port = 9000

[database]
url = "postgres://studio:pw@localhost:5432/studio"
max_connections = 20

[auth]
jwt_secret = "s3cret"

[mail]
api_url = "https://mail.example.com"
api_key = "key"
from_address = "hello@studio.example"
from_name = "Studio"

[throttle]
burst = 3
"#;

    #[test]
    fn parses_sample_and_keeps_defaults() {
        let mut cfg = parse(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.database.max_connections, 20);
        assert_eq!(cfg.database.min_connections, 2);
        assert!(cfg.mail.is_enabled());
        assert!(!cfg.media.is_enabled());
        assert_eq!(cfg.throttle.burst, 3);
        assert_eq!(cfg.throttle.refill_every_secs, 60);
        assert_eq!(cfg.calendar.calendar_id, "primary");
        assert_eq!(cfg.cache.ttl_secs, 60);
    }

    #[test]
    fn rejects_non_postgres_url() {
        let mut db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        db.normalize_from_env();
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_pool_bounds_inverted() {
        let db = DatabaseConfig {
            url: "postgres://localhost/x".into(),
            min_connections: 5,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn mail_requires_sender_when_enabled() {
        let mut cfg = parse(&SAMPLE.replace("hello@studio.example", "nobody")).unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }
}
