use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub asset_dir: PathBuf,
    pub header_image_asset: String,
    pub max_concurrent_renders: usize,
    pub scratch_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let max_concurrent_renders = var("MAX_CONCURRENT_RENDERS", "4")
            .parse::<usize>()
            .context("MAX_CONCURRENT_RENDERS must be a non-negative integer")?;
        if max_concurrent_renders == 0 {
            bail!("MAX_CONCURRENT_RENDERS must be at least 1");
        }

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .context("Required environment variable 'DATABASE_URL' is not set")?,
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            db_max_connections: var("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            run_migrations: var("RUN_MIGRATIONS", "true")
                .parse::<bool>()
                .context("RUN_MIGRATIONS must be 'true' or 'false'")?,
            asset_dir: PathBuf::from(var("ASSET_DIR", "assets")),
            header_image_asset: var("HEADER_IMAGE_ASSET", "header"),
            max_concurrent_renders,
            scratch_dir: lookup("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        })
    }
}
