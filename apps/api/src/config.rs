use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the resume backend that stores submitted resumes.
    pub resume_api_url: String,
    pub resume_api_timeout_secs: u64,
    /// Cookie whose presence marks a logged-in (non-guest) caller.
    pub session_cookie: String,
    /// Editing sessions idle this long are dropped.
    pub session_ttl_secs: u64,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            resume_api_url: require_env("RESUME_API_URL")?,
            resume_api_timeout_secs: std::env::var("RESUME_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("RESUME_API_TIMEOUT_SECS must be a whole number of seconds")?,
            session_cookie: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "SESSION".to_string()),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse::<u64>()
                .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Comma-separated origin list.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
