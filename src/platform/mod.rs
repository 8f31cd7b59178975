//! Typed client for the backend-as-a-service platform: account auth plus
//! simple row CRUD over its REST surface. The platform owns persistence,
//! password hashing, and row-level security; this wrapper only shapes
//! requests and surfaces provider error messages.

pub mod auth;
pub mod rows;
pub mod types;

use crate::{config::SiteConfig, errors::ApiError};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{Instrument, info_span};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PlatformClient {
    http: Client,
    base_url: String,
    anon_key: SecretString,
    access_token: Option<String>,
}

impl PlatformClient {
    /// Builds a client for the given platform base URL and publishable key.
    ///
    /// # Errors
    /// Returns an error if `base_url` cannot be parsed, has no host, or uses
    /// an unsupported scheme.
    pub fn new(base_url: &str, anon_key: SecretString) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|err| ApiError::Config(format!("Invalid platform URL: {err}")))?;
        if parsed.host().is_none() {
            return Err(ApiError::Config("Invalid platform URL: no host specified".to_string()));
        }
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ApiError::Config(format!(
                "Invalid platform URL: unsupported scheme {scheme}"
            )));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token: None,
        })
    }

    /// Builds a client from the site configuration.
    ///
    /// # Errors
    /// Returns an error when the configured platform URL is invalid.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ApiError> {
        Self::new(&config.platform_url, config.platform_anon_key.clone())
    }

    /// Attaches a user access token; later requests authenticate as that user.
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a JSON request with platform auth headers. Row endpoints pass
    /// extra headers (`Prefer`); `bearer_override` replaces the session or
    /// anon bearer for endpoints acting on an explicit token.
    pub(crate) async fn send_json(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        bearer_override: Option<&str>,
        extra_headers: &[(&str, &str)],
    ) -> Result<reqwest::Response, ApiError> {
        let endpoint = self.endpoint(path);
        let mut url = Url::parse(&endpoint)
            .map_err(|err| ApiError::Config(format!("Invalid platform URL: {err}")))?;
        for (name, value) in query {
            url.query_pairs_mut().append_pair(name, value);
        }

        let span = info_span!(
            "platform.request",
            http.method = %method,
            url = %url
        );

        let bearer = bearer_override
            .or(self.access_token.as_deref())
            .unwrap_or(self.anon_key.expose_secret())
            .to_string();

        let mut builder = self
            .http
            .request(method, url)
            .header("apikey", self.anon_key.expose_secret())
            .header("Authorization", format!("Bearer {bearer}"));
        for (name, value) in extra_headers {
            builder = builder.header(*name, *value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder.send().instrument(span).await.map_err(|err| {
            if err.is_timeout() {
                ApiError::Timeout("Request timed out. Please try again.".to_string())
            } else {
                ApiError::Network(format!("Unable to reach the server: {err}"))
            }
        })
    }

    /// Converts a non-success platform response into an HTTP error carrying
    /// the provider's message.
    pub(crate) async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .map(platform_error_message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.trim().to_string());
        ApiError::Http { status, message }
    }
}

/// Extracts the human-readable message from a platform error body. The
/// platform is inconsistent about the field name across endpoints.
fn platform_error_message(json_response: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| json_response.get(key).and_then(Value::as_str))
        .unwrap_or("")
        .to_string()
}
