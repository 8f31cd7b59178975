//! Environment configuration for the platform endpoints and serverless
//! function base. Values are read from `SOLMAR_*` environment variables so
//! static deployments can change endpoints without rebuilding. Configuration
//! values other than the anon key are public; do not store secrets here.

use secrecy::SecretString;
use std::env;

/// Site configuration derived from environment variables.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Base URL of the backend-as-a-service platform.
    pub platform_url: String,
    /// Publishable API key sent with every platform request.
    pub platform_anon_key: SecretString,
    /// Optional override for the serverless functions base URL. When unset
    /// the endpoint resolver decides per host.
    pub functions_base_override: Option<String>,
}

impl SiteConfig {
    /// Loads config from `SOLMAR_PLATFORM_URL`, `SOLMAR_PLATFORM_ANON_KEY`,
    /// and `SOLMAR_FUNCTIONS_BASE_URL`.
    ///
    /// # Errors
    /// Returns an error message when a required variable is missing or blank.
    pub fn load() -> Result<Self, String> {
        let platform_url = required_env("SOLMAR_PLATFORM_URL")?;
        let platform_anon_key = required_env("SOLMAR_PLATFORM_ANON_KEY")?;
        let functions_base_override =
            env::var("SOLMAR_FUNCTIONS_BASE_URL").ok().and_then(|value| normalize_value(&value));

        Ok(Self {
            platform_url,
            platform_anon_key: SecretString::from(platform_anon_key),
            functions_base_override,
        })
    }
}

fn required_env(name: &str) -> Result<String, String> {
    env::var(name)
        .ok()
        .and_then(|value| normalize_value(&value))
        .ok_or_else(|| format!("Missing required environment variable: {name}"))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
