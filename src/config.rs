use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenv::dotenv;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

/// Development default: the local CORS relay started by `tube-digest proxy`.
/// Production deployments point QWEN_API_URL at the dashscope host directly.
pub const DEV_QWEN_API_URL: &str =
    "http://localhost:8010/api/v1/services/aigc/text-generation/generation";

const SIMULATED_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub qwen_api_url: String,
    pub qwen_api_key: Option<String>,
    pub simulated_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            qwen_api_url: env::var("QWEN_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEV_QWEN_API_URL.to_string()),
            qwen_api_key: env::var("QWEN_API_KEY").ok().filter(|v| !v.is_empty()),
            simulated_delay: SIMULATED_DELAY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_qwen_url_points_at_local_proxy() {
        assert!(DEV_QWEN_API_URL.starts_with("http://localhost:8010/"));
    }

    #[test]
    fn default_delay_is_nonzero() {
        let config = AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            qwen_api_url: DEV_QWEN_API_URL.to_string(),
            qwen_api_key: None,
            simulated_delay: SIMULATED_DELAY,
        };
        assert!(!config.simulated_delay.is_zero());
    }
}
