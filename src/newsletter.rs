//! Client for the serverless add-subscriber function. Callers decide how to
//! treat failures; the registration workflow absorbs them, the footer signup
//! form surfaces them.

use crate::{
    api::{post_json_response, resolve},
    config::SiteConfig,
    errors::ApiError,
};
use serde::Serialize;
use serde_json::Value;

/// Path of the subscription function on the resolved base.
pub const SUBSCRIBE_PATH: &str = "/.netlify/functions/add-subscriber";

#[derive(Serialize)]
struct SubscribePayload<'a> {
    email: &'a str,
    name: &'a str,
    source: &'a str,
}

pub struct NewsletterClient {
    base_url: String,
}

impl NewsletterClient {
    /// Builds a client targeting an explicit base URL. An empty base means
    /// origin-relative calls.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Builds a client with the base resolved from the current host.
    #[must_use]
    pub fn from_host(current_host: &str, is_production: bool) -> Self {
        Self::new(resolve(current_host, is_production))
    }

    /// Builds a client from the site configuration, preferring the explicit
    /// override and falling back to host-based resolution.
    #[must_use]
    pub fn from_config(config: &SiteConfig, current_host: &str, is_production: bool) -> Self {
        match &config.functions_base_override {
            Some(base) => Self::new(base.clone()),
            None => Self::from_host(current_host, is_production),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribes an address to the mailing list. Email and name are trimmed
    /// before sending. Returns whether the function reported `success: true`;
    /// a missing or malformed success indicator counts as `false`.
    ///
    /// # Errors
    /// Returns an error when the request fails, times out, or the function
    /// responds with a non-success status.
    pub async fn subscribe(
        &self,
        email: &str,
        name: &str,
        source: &str,
    ) -> Result<bool, ApiError> {
        let payload = SubscribePayload {
            email: email.trim(),
            name: name.trim(),
            source,
        };

        let body: Value =
            post_json_response(&self.base_url, SUBSCRIBE_PATH, &payload, &[]).await?;
        Ok(body.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::{NewsletterClient, SUBSCRIBE_PATH};
    use crate::errors::ApiError;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn from_config_prefers_explicit_override() {
        let config = crate::config::SiteConfig {
            platform_url: "https://platform.solmar.rentals".to_string(),
            platform_anon_key: secrecy::SecretString::from("anon-key".to_string()),
            functions_base_override: Some("https://staging.solmar.rentals".to_string()),
        };
        let client = NewsletterClient::from_config(&config, "localhost", false);
        assert_eq!(client.base_url(), "https://staging.solmar.rentals");
    }

    #[test]
    fn from_config_falls_back_to_host_resolution() {
        let config = crate::config::SiteConfig {
            platform_url: "https://platform.solmar.rentals".to_string(),
            platform_anon_key: secrecy::SecretString::from("anon-key".to_string()),
            functions_base_override: None,
        };
        let local = NewsletterClient::from_config(&config, "localhost", false);
        let deployed = NewsletterClient::from_config(&config, "solmar.rentals", true);
        assert_eq!(local.base_url(), "https://solmar.rentals");
        assert_eq!(deployed.base_url(), "");
    }

    #[tokio::test]
    async fn subscribe_trims_email_and_name() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SUBSCRIBE_PATH))
            .and(body_json(json!({
                "email": "jane@x.com",
                "name": "Jane",
                "source": "registration"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let subscribed = NewsletterClient::new(server.uri())
            .subscribe(" jane@x.com ", " Jane ", "registration")
            .await
            .expect("subscribe should succeed");
        assert!(subscribed);
    }

    #[tokio::test]
    async fn subscribe_reports_false_when_function_declines() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SUBSCRIBE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let subscribed = NewsletterClient::new(server.uri())
            .subscribe("jane@x.com", "Jane", "footer")
            .await
            .expect("subscribe should succeed");
        assert!(!subscribed);
    }

    #[tokio::test]
    async fn subscribe_treats_malformed_body_as_not_subscribed() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SUBSCRIBE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 1})))
            .mount(&server)
            .await;

        let subscribed = NewsletterClient::new(server.uri())
            .subscribe("jane@x.com", "Jane", "registration")
            .await
            .expect("subscribe should succeed");
        assert!(!subscribed);
    }

    #[tokio::test]
    async fn subscribe_errors_on_server_failure() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SUBSCRIBE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = NewsletterClient::new(server.uri())
            .subscribe("jane@x.com", "Jane", "registration")
            .await
            .expect_err("subscribe should fail");
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }
}
