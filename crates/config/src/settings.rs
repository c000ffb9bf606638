use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Settings for the external identity provider's credentials.
///
/// Bearer credentials are verified against `secret` and `issuer`; the
/// service never issues credentials itself outside of test tooling.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub issuer: String,
    pub credential_ttl_secs: u64,
}

/// Rate limit applied to first-time profile creation.
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("CREWDECK"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "crewdeck")?
            .set_default("auth.secret", "change-me-in-production")?
            .set_default("auth.issuer", "crewdeck")?
            .set_default("auth.credential_ttl_secs", 3600)?
            .set_default("rate_limit.per_second", 10)?
            .set_default("rate_limit.burst", 30)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
