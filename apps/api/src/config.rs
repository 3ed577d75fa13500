use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Constructed once in `main` and carried in `AppState` — no process-wide
/// mutable singletons.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Maximum simultaneous in-flight oracle calls, uniform across both
    /// pipeline stages and independent of batch size.
    pub oracle_max_concurrency: usize,
    /// Per-call oracle timeout in seconds.
    pub oracle_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            oracle_max_concurrency: std::env::var("ORACLE_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .context("ORACLE_MAX_CONCURRENCY must be a positive integer")?,
            oracle_timeout_secs: std::env::var("ORACLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "90".to_string())
                .parse::<u64>()
                .context("ORACLE_TIMEOUT_SECS must be a positive integer")?,
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
