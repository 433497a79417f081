//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_JWT_SECRET;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub navigation: NavigationSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub breadcrumbs: BreadcrumbSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Scheme used when building absolute request URLs.
    pub public_scheme: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NavigationSettings {
    pub backend: StorageBackend,
    pub fixture_path: Option<String>,
    /// Only options attached to this site are shown when set.
    pub site_id: Option<i64>,
    /// Group rendered by the page shell.
    pub page_menu: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BreadcrumbSettings {
    pub root_title: String,
    pub root_url: Option<String>,
    pub root_route: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
    pub format: String,
    pub directory: Option<String>,
}

impl AppConfig {
    /// True when the built-in signing key is in use outside development.
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET && self.app.env != "development"
    }

    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &env)
    }

    /// Layers defaults, `{dir}/default`, `{dir}/{env}` and `APP__*` variables.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("app.env", env)?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "sitenav-server")?
            .set_default("app.public_scheme", "http")?
            .set_default("navigation.backend", "memory")?
            .set_default("navigation.page_menu", "main")?
            .set_default("database.url", "postgres://localhost/sitenav")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt.expiration_seconds", 3600)?
            .set_default("breadcrumbs.root_title", "Home")?
            .set_default("breadcrumbs.root_url", "/")?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}
