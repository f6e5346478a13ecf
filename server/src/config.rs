use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub mlb_api_base: String,
    pub port: u16,
    pub cache_ttl_minutes: i64,
    pub cors_origin: String, // "*" allows any origin
}

impl Config {
    /// Load config from a specific .env file, or the default `.env` if None.
    pub fn from_env_file(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                dotenvy::from_filename(p).ok();
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::build_from_env()
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::build_from_env()
    }

    fn build_from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: env("OPENAI_API_KEY", ""),
            openai_model: env("OPENAI_MODEL", "gpt-4o"),
            mlb_api_base: env("MLB_API_BASE", "https://statsapi.mlb.com"),
            port: env("PORT", "8000")
                .parse()
                .context("PORT must be a valid u16")?,
            cache_ttl_minutes: env("CACHE_TTL_MINUTES", "30")
                .parse()
                .context("CACHE_TTL_MINUTES must be a valid integer")?,
            cors_origin: env("CORS_ORIGIN", "*"),
        })
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
