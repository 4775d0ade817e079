use serde::Deserialize;
use std::env;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            // Load base config from TOML file
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let settings = config_builder.build()?;

        let api_base_url = settings
            .get_string("api.base_url")
            .or_else(|_| env::var("API_BASE_URL"))
            .map_err(|_| {
                config::ConfigError::Message(
                    "API base URL is not configured (set api.base_url or API_BASE_URL)".to_string(),
                )
            })?;

        // A malformed base URL must fail startup, not degrade into broken
        // request URLs at call time.
        let parsed = Url::parse(&api_base_url).map_err(|e| {
            config::ConfigError::Message(format!(
                "API base URL '{}' is not a valid URL: {}",
                api_base_url, e
            ))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(config::ConfigError::Message(format!(
                "API base URL '{}' must use http or https",
                api_base_url
            )));
        }

        Ok(Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }
}
