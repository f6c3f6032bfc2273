use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Base URL under which uploaded profile images are publicly reachable.
    pub public_asset_base_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the PostgreSQL connection pool.
    pub db_max_connections: u32,
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
            public_asset_base_url: require_env("PUBLIC_ASSET_BASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        for (key, value) in [
            ("DATABASE_URL", "postgres://localhost/cvsite"),
            ("S3_BUCKET", "cvsite"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("AWS_ACCESS_KEY_ID", "test"),
            ("AWS_SECRET_ACCESS_KEY", "test"),
            ("ANTHROPIC_API_KEY", "test"),
            ("PUBLIC_ASSET_BASE_URL", "http://localhost:9000/assets"),
        ] {
            std::env::set_var(key, value);
        }
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
        std::env::remove_var("PORT");

        let config = Config::from_env().unwrap();
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.port, 8080);

        std::env::set_var("DATABASE_MAX_CONNECTIONS", "25");
        let config = Config::from_env().unwrap();
        assert_eq!(config.db_max_connections, 25);
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
    }
}
