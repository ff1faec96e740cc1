use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_token: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            base_url: env::var("MEDIPOST_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.medipost.io/v1".to_string()),
            api_token: env::var("MEDIPOST_API_TOKEN")
                .context("MEDIPOST_API_TOKEN must be set")?,
        })
    }
}
